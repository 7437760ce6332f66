/// Database row types. These map directly to SQLite rows and stay free of
/// the wire types so the store does not depend on the API layer.

pub struct MessageRow {
    pub id: i64,
    pub identity: String,
    pub nickname: Option<String>,
    pub content: String,
    pub kind: String,
    pub created_at: i64,
}

/// Everything the handler has validated, ready to insert.
pub struct NewMessage<'a> {
    pub identity: &'a str,
    pub nickname: &'a str,
    pub content: &'a str,
    pub kind: &'a str,
    pub created_at: i64,
}

/// Which rows a listing should return.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    /// `None` means every kind.
    pub kind: Option<String>,
    /// `None` means every identity.
    pub identity: Option<String>,
    pub limit: u32,
    pub offset: u64,
}
