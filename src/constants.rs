pub const MESSAGE_INVALID_TOKEN: &str = "Invalid token, please login again";
pub const MESSAGE_INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ONE_WEEK: usize = 60 * 60 * 24 * 7;

// Routes reachable without a bearer token
pub const IGNORE_ROUTES: [&str; 3] = ["/register", "/login", "/health"];
