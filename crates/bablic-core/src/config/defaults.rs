pub(super) fn default_log_level() -> String {
    "info".to_string()
}
pub(super) fn default_data_dir() -> String {
    "~/.bablic".to_string()
}
pub(super) fn default_cdn_host() -> String {
    "c.bablic.com".to_string()
}
pub(super) fn default_report_host() -> String {
    "e2.bablic.com".to_string()
}
pub(super) fn default_debug_report_host() -> String {
    "staging.bablic.com".to_string()
}
pub(super) fn default_quiet_period_ms() -> u64 {
    1000
}
