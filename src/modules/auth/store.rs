use super::session::SessionError;

/// Stored pair of digests for one registered account. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    identifier_hash: String,
    password_hash: String,
}

impl CredentialRecord {
    pub fn new(identifier_hash: String, password_hash: String) -> Self {
        Self {
            identifier_hash,
            password_hash,
        }
    }

    pub fn identifier_hash(&self) -> &str {
        &self.identifier_hash
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// Where credential records live. Lookups only ever happen by digest.
pub trait CredentialRepository {
    fn find_by_identifier_hash(&self, identifier_hash: &str) -> Option<&CredentialRecord>;

    /// Record whose identifier and password digests both match
    fn find_match(&self, identifier_hash: &str, password_hash: &str) -> Option<&CredentialRecord>;

    /// Append a record, refusing a second record for the same identifier
    fn insert(&mut self, record: CredentialRecord) -> Result<(), SessionError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered in-memory list of records, searched linearly
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    records: Vec<CredentialRecord>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }
}

impl CredentialRepository for InMemoryCredentials {
    fn find_by_identifier_hash(&self, identifier_hash: &str) -> Option<&CredentialRecord> {
        self.records
            .iter()
            .find(|r| r.identifier_hash == identifier_hash)
    }

    fn find_match(&self, identifier_hash: &str, password_hash: &str) -> Option<&CredentialRecord> {
        self.records
            .iter()
            .find(|r| r.identifier_hash == identifier_hash && r.password_hash == password_hash)
    }

    fn insert(&mut self, record: CredentialRecord) -> Result<(), SessionError> {
        if self.find_by_identifier_hash(&record.identifier_hash).is_some() {
            return Err(SessionError::AlreadyRegistered);
        }
        self.records.push(record);
        Ok(())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
