use crate::location::LocationCheck;

pub struct AppState {
    pub check: LocationCheck,
}
