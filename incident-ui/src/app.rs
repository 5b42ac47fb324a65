use crate::bridge;
use crate::incidents_table::IncidentsTable;
use incident_core::Incident;
use leptos::*;

#[component]
pub fn App() -> impl IntoView {
    // Starts empty so the table restores whatever the browser last saved.
    let incidents = create_rw_signal(Vec::<Incident>::new());
    let config = bridge::page_config();

    let on_change = Callback::new(move |next: Vec<Incident>| {
        tracing::info!(count = next.len(), "incidents changed");
        incidents.set(next);
    });

    view! {
      <div class="dashboard-container">
        <main class="dashboard-content">
          <IncidentsTable
            incidents=incidents
            on_incidents_change=on_change
            config=config
          />
        </main>
      </div>
    }
}
