/// Row type for the `local_storage` table.
#[derive(Debug, Clone)]
pub struct StorageRow {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}
