use zeroize::Zeroizing;

/// One validated input row. The hostname is the dedup key for the run;
/// the secret stays wrapped until it is copied into a generated record.
#[derive(Debug, Clone)]
pub struct HostCredentialEntry {
    pub hostname: String,
    pub username: String,
    pub password: Zeroizing<String>,
}
