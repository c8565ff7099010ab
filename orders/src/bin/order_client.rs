use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use common::config::{ClientConfig, load_env_file};
use orders::{
    client::{ClientError, OrderApi, OrderBoard, OrderDraft, OrderFilter, PhotoFile},
    model::{FoodCategory, GenericError, OrderRecord},
};
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about = "Place and manage food orders", long_about = None)]
struct Args {
    /// Base address of the order service, overrides ORDER_API_URL
    #[arg(long)]
    api_url: Option<Url>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show orders, optionally filtered
    List {
        #[arg(long, value_parser = parse_category)]
        category: Option<FoodCategory>,

        /// Matches food, customer name or city
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Place a new order
    Create {
        #[command(flatten)]
        fields: FieldArgs,

        #[arg(long)]
        photo: PathBuf,
    },
    /// Change an existing order; omitted values keep their current value
    Update {
        id: String,

        #[command(flatten)]
        fields: FieldArgs,

        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Delete an order and its photo
    Delete { id: String },
}

#[derive(ClapArgs, Debug, Default)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    pincode: Option<String>,
    #[arg(long)]
    food: Option<String>,
    #[arg(long, value_parser = parse_category)]
    category: Option<FoodCategory>,
}

impl FieldArgs {
    fn apply_to(self, draft: &mut OrderDraft) {
        let text_fields = [
            (self.name, &mut draft.name),
            (self.phone, &mut draft.phone),
            (self.city, &mut draft.city),
            (self.pincode, &mut draft.pincode),
            (self.food, &mut draft.food),
        ];
        for (value, field) in text_fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
    }
}

fn parse_category(raw: &str) -> Result<FoodCategory, String> {
    FoodCategory::parse(raw).map_err(|e| e.to_string())
}

fn print_record(record: &OrderRecord) {
    let order = &record.order;
    println!(
        "{}  {} ({})  {}  {}, {} {}  {}",
        order.id, order.food, order.category, order.name, order.phone, order.city, order.pincode, record.photo_url
    );
}

async fn run(api: &OrderApi, command: Command) -> Result<(), ClientError> {
    match command {
        Command::List { category, search } => {
            let mut board = OrderBoard::new();
            board.replace_all(api.list_orders().await?);

            let filter = OrderFilter { category, search };
            let shown = board.filter(&filter);
            if shown.is_empty() {
                println!("No orders found");
            }
            for record in shown {
                print_record(record);
            }
        }
        Command::Create { fields, photo } => {
            let mut draft = OrderDraft::default();
            fields.apply_to(&mut draft);
            draft.photo = Some(PhotoFile::from_path(&photo).await?);

            let record = api.create_order(draft).await?;
            println!("Order placed successfully!");
            print_record(&record);
        }
        Command::Update { id, fields, photo } => {
            let mut board = OrderBoard::new();
            board.replace_all(api.list_orders().await?);
            let existing = board
                .get(&id)
                .ok_or_else(|| ClientError::Validation(format!("Order {id} not found")))?;

            let mut draft = OrderDraft::from_record(existing);
            fields.apply_to(&mut draft);
            if let Some(photo) = photo {
                draft.photo = Some(PhotoFile::from_path(&photo).await?);
            }

            let record = api.update_order(&id, draft).await?;
            println!("Order updated successfully!");
            print_record(&record);
        }
        Command::Delete { id } => {
            let record = api.delete_order(&id).await?;
            println!("Order deleted successfully!");
            print_record(&record);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), GenericError> {
    let args = Args::parse();
    load_env_file(None)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let api_url = match args.api_url {
        Some(url) => url,
        None => ClientConfig::from_env()?.api_url,
    };
    let api = OrderApi::new(&api_url)?;

    if let Err(e) = run(&api, args.command).await {
        tracing::error!(error = %e, "Order request failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}
