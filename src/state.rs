use crate::{
    config::AppConfig,
    db::DbPool,
    services::{
        expenses::ExpenseService, itinerary::ItineraryService, ledger::LedgerService,
        places::PlaceService, trips::TripService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    pub trips: TripService,
    pub places: PlaceService,
    pub itinerary: ItineraryService,
    pub expenses: ExpenseService,
    pub ledger: LedgerService,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool) -> Self {
        let trips = TripService::new(db.clone(), config.default_currency.clone());
        Self {
            places: PlaceService::new(db.clone()),
            itinerary: ItineraryService::new(db.clone()),
            expenses: ExpenseService::new(db.clone()),
            ledger: LedgerService::new(db.clone()),
            trips,
            config,
            db,
        }
    }
}
