use crate::model::mongo_model::{OrderDocument, set_document};
use crate::model::{GenericError, NewOrder, Order, OrderChanges};
use crate::storage::OrderStorage;
use async_trait::async_trait;
use chrono::Utc;
use common::config::StoreConfig;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database};
use tracing::{debug, info};

const ORDERS_COLLECTION: &str = "orders";

#[derive(Clone)]
pub struct MongoOrderStorage {
    pub client: Client,
    pub database: Database,
}

impl MongoOrderStorage {
    async fn get_connection(conn_str: &str, db_name: &str) -> Result<(Client, Database), GenericError> {
        info!("Connecting to MongoDB database {db_name}");
        let client = Client::with_uri_str(conn_str).await?;
        let database = client.database(db_name);
        database.run_command(doc! { "ping": 1 }).await?;
        info!("Connected to MongoDB database {db_name}");
        Ok((client, database))
    }

    pub async fn new(conn_str: &str, db_name: &str) -> Result<Self, GenericError> {
        let (client, database) = Self::get_connection(conn_str, db_name).await?;
        Ok(Self { client, database })
    }

    pub async fn from_config(config: &StoreConfig) -> Result<Self, GenericError> {
        Self::new(&config.mongodb_uri, &config.database_name).await
    }

    fn orders(&self) -> Collection<OrderDocument> {
        self.database.collection(ORDERS_COLLECTION)
    }

    /// Ids that are not valid ObjectId hex cannot match any stored order.
    fn object_id(id: &str) -> Option<ObjectId> {
        match ObjectId::parse_str(id) {
            Ok(oid) => Some(oid),
            Err(_) => {
                debug!("Order id {id} is not a valid ObjectId");
                None
            }
        }
    }
}

#[async_trait]
impl OrderStorage for MongoOrderStorage {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, GenericError> {
        let document = OrderDocument::from_new(order, Utc::now());
        self.orders().insert_one(&document).await?;
        Ok(document.into())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, GenericError> {
        let documents: Vec<OrderDocument> = self.orders().find(doc! {}).await?.try_collect().await?;
        Ok(documents.into_iter().map(Order::from).collect())
    }

    async fn get_order(&self, id: &str) -> Result<Option<Order>, GenericError> {
        let Some(oid) = Self::object_id(id) else {
            return Ok(None);
        };
        let document = self.orders().find_one(doc! { "_id": oid }).await?;
        Ok(document.map(Order::from))
    }

    async fn update_order(&self, id: &str, changes: &OrderChanges) -> Result<Option<Order>, GenericError> {
        let Some(oid) = Self::object_id(id) else {
            return Ok(None);
        };
        let document = self
            .orders()
            .find_one_and_update(doc! { "_id": oid }, set_document(changes, Utc::now()))
            .return_document(ReturnDocument::After)
            .await?;
        Ok(document.map(Order::from))
    }

    async fn delete_order(&self, id: &str) -> Result<Option<Order>, GenericError> {
        let Some(oid) = Self::object_id(id) else {
            return Ok(None);
        };
        let document = self.orders().find_one_and_delete(doc! { "_id": oid }).await?;
        Ok(document.map(Order::from))
    }
}
