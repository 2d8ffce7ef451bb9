use std::path::PathBuf;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn port(&self) -> String;
    fn data_file(&self) -> PathBuf;
    fn rate_limit_per_minute(&self) -> u32;
}
