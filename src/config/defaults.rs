use std::path::PathBuf;

pub fn default_version() -> u32 {
    1
}

pub fn default_roster() -> PathBuf {
    PathBuf::from("roster.yaml")
}

pub fn default_store_dir() -> PathBuf {
    PathBuf::from(".salo360")
}

pub fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

pub fn default_admin_role() -> String {
    "admin".to_string()
}

pub fn default_scale_min() -> u8 {
    1
}

pub fn default_scale_max() -> u8 {
    5
}

pub fn default_timeout_sec() -> u64 {
    30
}

pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_backoff_base_ms() -> u64 {
    200
}
