use crate::bridge::{self, BrowserStorage};
use incident_core::{
    Clock, Field, Incident, IncidentId, IncidentTable, RowMode, Status, StatusFilter, StorageSlot,
    TableConfig,
};
use leptos::*;

type Table = IncidentTable<BrowserStorage>;

fn badge_class(status: Status) -> String {
    format!("status-badge {}", status.as_str())
}

fn status_options() -> impl IntoView {
    Status::ALL
        .iter()
        .map(|status| view! { <option value=status.as_str()>{status.label()}</option> })
        .collect_view()
}

/// One row's record, notifying only when that record changes.
fn row_record<S, C>(table: RwSignal<IncidentTable<S, C>>, id: IncidentId) -> Memo<Incident>
where
    S: StorageSlot + 'static,
    C: Clock + 'static,
{
    create_memo(move |_| table.with(|t| t.get(id).cloned()).unwrap_or_default())
}

/// Controller signal plus the owner notification that must fire only after
/// the controller borrow is released.
#[derive(Clone, Copy)]
struct TableHandle {
    table: RwSignal<Table>,
    pending: StoredValue<Option<Vec<Incident>>>,
    on_change: Option<Callback<Vec<Incident>>>,
}

impl TableHandle {
    fn new(config: TableConfig, on_change: Option<Callback<Vec<Incident>>>) -> Self {
        let pending = store_value(None::<Vec<Incident>>);
        let mut controller = IncidentTable::new(BrowserStorage, config);
        if on_change.is_some() {
            controller.set_on_change(move |list| pending.set_value(Some(list.to_vec())));
        }
        Self {
            table: create_rw_signal(controller),
            pending,
            on_change,
        }
    }

    fn read<R>(&self, f: impl FnOnce(&Table) -> R) -> R {
        self.table.with(f)
    }

    fn edit(&self, f: impl FnOnce(&mut Table)) {
        self.table.update(f);
        let mut next = None;
        self.pending.update_value(|p| next = p.take());
        if let (Some(next), Some(on_change)) = (next, self.on_change) {
            on_change.call(next);
        }
    }
}

#[component]
pub fn IncidentsTable(
    /// Incidents supplied by the owner; empty means "restore from storage".
    #[prop(optional, into)]
    incidents: Option<Signal<Vec<Incident>>>,
    #[prop(optional)] on_incidents_change: Option<Callback<Vec<Incident>>>,
    #[prop(optional)] config: Option<TableConfig>,
) -> impl IntoView {
    let handle = TableHandle::new(config.unwrap_or_default(), on_incidents_change);

    create_effect(move |_| {
        let external = incidents.map(|s| s.get()).unwrap_or_default();
        handle.table.update(|t| t.reconcile(&external));
    });

    let visible = create_memo(move |_| handle.read(|t| t.visible()));

    view! {
      <section class="dashboard-section history-section">
        <h2>"Recent Incidents"</h2>

        <div class="incidents-controls">
          <input
            type="text"
            class="incidents-search"
            placeholder="Search incidents..."
            prop:value=move || handle.read(|t| t.search().to_string())
            on:input=move |ev| handle.edit(|t| t.set_search(event_target_value(&ev)))
          />
          <select
            class="incidents-filter"
            prop:value=move || handle.read(|t| t.status_filter().as_str())
            on:change=move |ev| {
              match event_target_value(&ev).parse::<StatusFilter>() {
                Ok(filter) => handle.edit(|t| t.set_status_filter(filter)),
                Err(e) => tracing::warn!(error = %e, "ignoring status filter"),
              }
            }
          >
            <option value="all">"All Statuses"</option>
            <option value="resolved">"Resolved"</option>
            <option value="investigating">"Investigating"</option>
          </select>
          <div class="incidents-actions">
            <Show
              when=move || handle.read(|t| t.is_adding())
              fallback=move || view! {
                <button class="btn" on:click=move |_| handle.edit(|t| t.start_adding())>"Add Incident"</button>
              }
            >
              <AddForm handle=handle/>
            </Show>
          </div>
        </div>

        <table class="incidents-table">
          <thead>
            <tr>
              <th>"ID"</th>
              <th>"Event Type"</th>
              <th>"Location"</th>
              <th>"Detection Method"</th>
              <th>"Time"</th>
              <th>"Status"</th>
              <th>"Actions"</th>
            </tr>
          </thead>
          <tbody>
            <For
              each=move || visible.get()
              key=|i| i.id
              children=move |i| view! { <IncidentRow handle=handle id=i.id/> }
            />
            {move || visible.with(Vec::is_empty).then(|| view! {
              <tr>
                <td colspan="7" class="no-results">"No incidents match your search."</td>
              </tr>
            })}
          </tbody>
        </table>
      </section>
    }
}

#[component]
fn AddForm(handle: TableHandle) -> impl IntoView {
    let field = move |field: Field| {
        view! {
          <div class="field">
            <input
              placeholder=field.placeholder()
              prop:value=move || handle.read(|t| t.new_draft().get(field).to_string())
              on:input=move |ev| handle.edit(|t| t.set_new_field(field, event_target_value(&ev)))
            />
            {move || handle.read(|t| t.new_errors().get(field)).map(|msg| view! {
              <div class="input-error">{msg}</div>
            })}
          </div>
        }
    };

    let save = move |_: ev::MouseEvent| {
        handle.edit(|t| {
            if let Ok(id) = t.create() {
                tracing::info!(id, "incident added");
            }
        })
    };

    view! {
      <div class="add-form">
        {Field::ALL.into_iter().map(field).collect_view()}
        <select
          prop:value=move || handle.read(|t| t.new_draft().status.as_str())
          on:change=move |ev| {
            if let Ok(status) = event_target_value(&ev).parse::<Status>() {
              handle.edit(|t| t.new_draft_mut().status = status);
            }
          }
        >
          {status_options()}
        </select>
        <button class="btn btn-primary" on:click=save>"Save"</button>
        <button class="btn" on:click=move |_| handle.edit(|t| t.cancel_adding())>"Cancel"</button>
      </div>
    }
}

#[component]
fn IncidentRow(handle: TableHandle, id: IncidentId) -> impl IntoView {
    let delete = move |_: ev::MouseEvent| {
        handle.edit(|t| {
            t.delete(id, &mut |msg: &str| bridge::confirm(msg));
        })
    };

    let record = row_record(handle.table, id);

    let viewing = move || {
        let incident = record.get();
        view! {
          <td>{incident.kind}</td>
          <td>{incident.location}</td>
          <td>{incident.method}</td>
          <td>{incident.time}</td>
          <td>
            <span class=badge_class(incident.status)>{incident.status.as_str()}</span>
          </td>
          <td class="row-actions">
            <button class="btn" on:click=move |_| handle.edit(|t| { t.start_edit(id); })>"Edit"</button>
            <button class="btn btn-danger" on:click=delete>"Delete"</button>
          </td>
        }
    };

    let edit_cell = move |field: Field| {
        view! {
          <td>
            <input
              prop:value=move || handle.read(|t| t.edit_draft().get(field).to_string())
              on:input=move |ev| handle.edit(|t| t.set_edit_field(field, event_target_value(&ev)))
            />
            {move || handle.read(|t| t.edit_errors().get(field)).map(|msg| view! {
              <div class="input-error">{msg}</div>
            })}
          </td>
        }
    };

    let editing = move || {
        view! {
          {Field::ALL.into_iter().map(edit_cell).collect_view()}
          <td>
            <select
              prop:value=move || handle.read(|t| t.edit_draft().status.as_str())
              on:change=move |ev| {
                if let Ok(status) = event_target_value(&ev).parse::<Status>() {
                  handle.edit(|t| t.edit_draft_mut().status = status);
                }
              }
            >
              {status_options()}
            </select>
          </td>
          <td class="row-actions">
            <button class="btn btn-primary" on:click=move |_| handle.edit(|t| { let _ = t.update(id); })>"Save"</button>
            <button class="btn" on:click=move |_| handle.edit(|t| t.cancel_edit())>"Cancel"</button>
            <button class="btn btn-danger" on:click=delete>"Delete"</button>
          </td>
        }
    };

    let mode = create_memo(move |_| handle.read(|t| t.row_mode(id)));

    view! {
      <tr>
        <td>{id}</td>
        {move || match mode.get() {
          RowMode::Editing => editing().into_view(),
          RowMode::Viewing => viewing().into_view(),
        }}
      </tr>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use incident_core::MemoryStorage;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn badge_class_follows_status() {
        assert_eq!(badge_class(Status::Investigating), "status-badge investigating");
        assert_eq!(badge_class(Status::Resolved), "status-badge resolved");
    }

    #[test]
    fn row_record_ignores_unrelated_table_changes() {
        let runtime = create_runtime();
        let mut controller = IncidentTable::new(MemoryStorage::new(), TableConfig::default());
        controller.reconcile(&[
            Incident { id: 1, kind: "Fire".into(), location: "A".into(), method: "Sensor".into(), time: "t1".into(), ..Default::default() },
            Incident { id: 2, kind: "Flood".into(), location: "B".into(), method: "Report".into(), time: "t2".into(), ..Default::default() },
        ]);
        let table = create_rw_signal(controller);
        let record = row_record(table, 1);

        let runs = Rc::new(Cell::new(0));
        let seen = Rc::clone(&runs);
        create_effect(move |_| {
            record.with(|_| ());
            seen.set(seen.get() + 1);
        });
        assert_eq!(runs.get(), 1);

        table.update(|t| t.set_search("flood"));
        table.update(|t| {
            t.start_edit(2);
            t.set_edit_field(Field::Location, "Basement");
            t.update(2).expect("update");
        });
        assert_eq!(runs.get(), 1);

        table.update(|t| {
            t.start_edit(1);
            t.set_edit_field(Field::Location, "Dock 9");
            t.update(1).expect("update");
        });
        assert_eq!(runs.get(), 2);
        assert_eq!(record.get_untracked().location, "Dock 9");

        runtime.dispose();
    }
}
