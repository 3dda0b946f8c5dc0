use sethorize_db::{Client, Session};

/// Request extension inserted by the session guard for downstream handlers.
#[derive(Clone, Debug)]
pub struct CurrentSession(pub Session);

/// Request extension inserted by the client guard.
#[derive(Clone, Debug)]
pub struct CurrentClient(pub Client);

/// Request extension carrying the resolved caller address.
#[derive(Clone, Debug)]
pub struct ClientIp(pub String);
