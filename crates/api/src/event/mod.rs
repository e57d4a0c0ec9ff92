mod add_attendee;
mod create_event;
pub mod dispatch_goes_live;
mod get_event;
mod rsvp_event;
pub mod schedule_goes_live;
mod subscribers;

use actix_web::web;
use add_attendee::add_attendee_controller;
use create_event::create_event_controller;
use get_event::get_event_controller;
use rsvp_event::rsvp_event_controller;
use schedule_goes_live::schedule_goes_live_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/events", web::post().to(create_event_controller));
    cfg.route("/events/{event_id}", web::get().to(get_event_controller));
    cfg.route(
        "/events/{event_id}/attendees",
        web::post().to(add_attendee_controller),
    );
    cfg.route("/events/{event_id}/rsvp", web::put().to(rsvp_event_controller));
    cfg.route(
        "/events/{event_id}/goes-live-notifications",
        web::post().to(schedule_goes_live_controller),
    );
}
