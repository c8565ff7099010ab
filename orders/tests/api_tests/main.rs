
mod delete_tests;
mod list_tests;
mod update_tests;
mod uploads_tests;
