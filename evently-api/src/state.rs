use evently_core::BookingService;

#[derive(Clone)]
pub struct AppState {
    pub bookings: BookingService,
    pub environment: String,
}
