/// A resource declaration as it appears on the wire, with attributes already
/// canonicalized to a sorted-key JSON string. Equal declarations serialize
/// identically, which is what the storage dedup keys rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceDecl {
    pub attrs_json: String,
    pub schema_url: String,
}

impl Default for ResourceDecl {
    fn default() -> Self {
        Self {
            attrs_json: "{}".to_string(),
            schema_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeDecl {
    pub name: String,
    pub version: String,
    pub attrs_json: String,
    pub schema_url: String,
}

impl Default for ScopeDecl {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: String::new(),
            attrs_json: "{}".to_string(),
            schema_url: String::new(),
        }
    }
}
