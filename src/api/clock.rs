use actix_web::{HttpResponse, Responder, get, web};

use crate::clock::{ClockDisplay, LiveClock};

/// Current time in the service's display zone
#[utoipa::path(
    get,
    path = "/clock",
    responses(
        (status = 200, description = "Clock display strings", body = ClockDisplay)
    ),
    tag = "Clock"
)]
#[get("/clock")]
pub async fn current_time(clock: web::Data<LiveClock>) -> impl Responder {
    HttpResponse::Ok().json(clock.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use chrono::{FixedOffset, TimeZone, Utc};

    #[actix_web::test]
    async fn serves_the_latest_tick() {
        let clock = LiveClock::new(FixedOffset::east_opt(0).unwrap().into());
        clock.refresh(Utc.with_ymd_and_hms(2026, 10, 18, 15, 4, 5).unwrap());

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(clock))
                .service(current_time),
        )
        .await;

        let req = test::TestRequest::get().uri("/clock").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["full"], "October 18, 2026, 03:04:05 PM");
        assert_eq!(body["time"], "15:04:05");
        assert_eq!(body["date"], "October 18, 2026");
    }
}
