mod app;
mod bridge;
mod incidents_table;
mod logging;

fn main() {
    logging::init_logging();
    leptos::mount_to_body(app::App);
}
