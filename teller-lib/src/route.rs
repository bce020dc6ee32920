//! Navigation routes and the account guard

use crate::state::SettingsStore;

/// The client's navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Landing view; always reachable.
    Home,
    /// Session binding view; always reachable.
    Settings,
    /// Deposit form; requires a bound account.
    Deposit,
    /// Withdrawal form; requires a bound account.
    Withdraw,
    /// Transaction history; requires a bound account.
    Transactions,
}

impl Route {
    /// Whether entering this route requires a bound account id.
    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Deposit | Self::Withdraw | Self::Transactions)
    }

    /// Where a navigation to this route actually lands.
    ///
    /// A protected route with no bound account id redirects to
    /// [`Route::Home`]; anything else proceeds unchanged. Evaluated fresh
    /// on every call — clearing the id re-gates the very next navigation.
    #[must_use]
    pub fn gate(self, settings: &SettingsStore) -> Self {
        if self.is_protected() && settings.account_id().trim().is_empty() {
            Self::Home
        } else {
            self
        }
    }
}
