pub const USER_AGENT: &str = concat!(
    "Portfolio Contact Backend (Version ",
    env!("CARGO_PKG_VERSION"),
    ")"
);
