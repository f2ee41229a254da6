use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// from_lookup
// =============================================================================

#[test]
fn from_lookup_applies_defaults() {
    let cfg = ApiConfig::from_lookup(lookup_from(&[(ENV_API_URL, "http://api.test")])).unwrap();
    assert_eq!(cfg.base_url, "http://api.test");
    assert_eq!(cfg.signup_endpoint, SignUpEndpoint::Auth);
    assert_eq!(
        cfg.timeouts,
        ApiTimeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
    assert_eq!(cfg.token_file, PathBuf::from(DEFAULT_TOKEN_FILE));
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = ApiConfig::from_lookup(lookup_from(&[
        (ENV_API_URL, "https://auth.example.test/api/"),
        (ENV_SIGNUP_ENDPOINT, "Users"),
        (ENV_REQUEST_TIMEOUT_SECS, "42"),
        (ENV_CONNECT_TIMEOUT_SECS, " 7 "),
        (ENV_TOKEN_FILE, "/tmp/gatehouse/tokens.json"),
    ]))
    .unwrap();
    assert_eq!(cfg.base_url, "https://auth.example.test/api");
    assert_eq!(cfg.signup_endpoint, SignUpEndpoint::Users);
    assert_eq!(cfg.timeouts, ApiTimeouts { request_secs: 42, connect_secs: 7 });
    assert_eq!(cfg.token_file, PathBuf::from("/tmp/gatehouse/tokens.json"));
}

#[test]
fn from_lookup_requires_base_url() {
    let err = ApiConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::MissingBaseUrl));
}

#[test]
fn from_lookup_rejects_blank_base_url() {
    let err = ApiConfig::from_lookup(lookup_from(&[(ENV_API_URL, "  / ")])).unwrap_err();
    assert!(matches!(err, ConfigError::MissingBaseUrl));
}

#[test]
fn from_lookup_rejects_unknown_signup_endpoint() {
    let err = ApiConfig::from_lookup(lookup_from(&[(ENV_API_URL, "http://api.test"), (ENV_SIGNUP_ENDPOINT, "register")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSignUpEndpoint(ref raw) if raw == "register"));
}

#[test]
fn from_lookup_invalid_timeouts_fall_back() {
    let cfg = ApiConfig::from_lookup(lookup_from(&[
        (ENV_API_URL, "http://api.test"),
        (ENV_REQUEST_TIMEOUT_SECS, "soon"),
        (ENV_CONNECT_TIMEOUT_SECS, "-1"),
    ]))
    .unwrap();
    assert_eq!(cfg.timeouts, ApiTimeouts::default());
}

#[test]
fn from_lookup_blank_token_file_uses_default() {
    let cfg = ApiConfig::from_lookup(lookup_from(&[(ENV_API_URL, "http://api.test"), (ENV_TOKEN_FILE, "")])).unwrap();
    assert_eq!(cfg.token_file, PathBuf::from(DEFAULT_TOKEN_FILE));
}

// =============================================================================
// from_env
// =============================================================================

/// Mutates the process environment.
///
/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
#[test]
fn from_env_reads_process_environment() {
    unsafe {
        std::env::set_var(ENV_API_URL, "http://env.test/");
        std::env::remove_var(ENV_SIGNUP_ENDPOINT);
    }

    let cfg = ApiConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "http://env.test");
    assert_eq!(cfg.signup_endpoint, SignUpEndpoint::Auth);

    unsafe { std::env::remove_var(ENV_API_URL) };
}

// =============================================================================
// SignUpEndpoint
// =============================================================================

#[test]
fn signup_endpoint_paths() {
    assert_eq!(SignUpEndpoint::Auth.path(), "/auth/signup");
    assert_eq!(SignUpEndpoint::Users.path(), "/users");
}

#[test]
fn new_strips_trailing_slashes() {
    let cfg = ApiConfig::new("http://api.test//");
    assert_eq!(cfg.base_url, "http://api.test");
}
