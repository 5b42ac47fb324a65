use crate::model::{Incident, StatusFilter};

/// Rows shown for a search query and status selector, in collection order.
///
/// The query is matched case-insensitively and untrimmed against the id,
/// type, location and method of each incident.
pub fn filter_incidents(incidents: &[Incident], query: &str, status: StatusFilter) -> Vec<Incident> {
    let needle = query.to_lowercase();
    incidents
        .iter()
        .filter(|incident| status.matches(incident.status) && incident.mentions(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;

    fn incident(id: i64, kind: &str, location: &str, method: &str, status: Status) -> Incident {
        Incident {
            id,
            kind: kind.into(),
            location: location.into(),
            method: method.into(),
            time: "t".into(),
            status,
        }
    }

    fn sample() -> Vec<Incident> {
        vec![
            incident(12, "Fire", "Warehouse A", "Sensor", Status::Investigating),
            incident(3, "Flood", "Basement", "Report", Status::Resolved),
            incident(7, "Intrusion", "Gate 2", "Camera", Status::Investigating),
        ]
    }

    #[test]
    fn empty_query_and_all_returns_everything() {
        let list = sample();
        assert_eq!(filter_incidents(&list, "", StatusFilter::All), list);
    }

    #[test]
    fn matches_case_insensitively_across_fields() {
        let list = sample();
        let ids = |q: &str| {
            filter_incidents(&list, q, StatusFilter::All)
                .iter()
                .map(|i| i.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids("FIRE"), vec![12]);
        assert_eq!(ids("base"), vec![3]);
        assert_eq!(ids("camera"), vec![7]);
        assert_eq!(ids("2"), vec![12, 7]);
        assert!(ids("nothing").is_empty());
    }

    #[test]
    fn status_filter_combines_with_query() {
        let list = sample();
        let shown = filter_incidents(&list, "", StatusFilter::Only(Status::Investigating));
        assert_eq!(shown.iter().map(|i| i.id).collect::<Vec<_>>(), vec![12, 7]);

        let shown = filter_incidents(&list, "flood", StatusFilter::Only(Status::Investigating));
        assert!(shown.is_empty());
    }

    #[test]
    fn query_is_not_trimmed() {
        let list = sample();
        assert!(filter_incidents(&list, " fire", StatusFilter::All).is_empty());
    }
}
