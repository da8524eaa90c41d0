use crate::ports::PlatformFuture;
use crate::types::worker::WindowClient;

/// `self.clients` restricted to window clients.
pub trait WindowClients: Clone + Send + Sync + 'static {
    /// Origin of the worker scope, e.g. `https://example.com`.
    fn origin(&self) -> &str;

    /// All window clients, including those not controlled by this worker.
    fn match_all<'a>(&'a self) -> PlatformFuture<'a, Vec<WindowClient>>;

    fn focus<'a>(&'a self, client: &'a WindowClient) -> PlatformFuture<'a, WindowClient>;

    /// Resolves to `None` when the platform does not report the navigated client.
    fn navigate<'a>(
        &'a self,
        client: &'a WindowClient,
        url: &'a str,
    ) -> PlatformFuture<'a, Option<WindowClient>>;

    fn open_window<'a>(&'a self, url: &'a str) -> PlatformFuture<'a, Option<WindowClient>>;

    fn claim<'a>(&'a self) -> PlatformFuture<'a, ()>;
}
