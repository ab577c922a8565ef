//! What a flow needs from the screen it runs on.

/// Indicators a form exposes to its flow.
pub trait FormView: Send {
    fn set_error(&mut self, message: &str);
    fn set_success(&mut self, message: &str);
    fn set_loading(&mut self, loading: bool);
}

/// Screens a flow can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Register.path(), "/register");
    }
}
