use rand::{distributions::Alphanumeric, Rng};

const TOKEN_LEN: usize = 48;

/// Opaque bearer token issued at signup. Constant for the account's
/// lifetime; no rotation or expiry in this design.
pub fn generate_access_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_fixed_length_alphanumeric() {
        let token = generate_access_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_access_token(), generate_access_token());
    }
}
