use crate::schema::kv_store;

use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = kv_store)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KvRow {
  pub key: String,
  pub value: String,
  pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = kv_store)]
pub struct NewKvRow<'a> {
  pub key: &'a str,
  pub value: &'a str,
  pub updated_at: String,
}
