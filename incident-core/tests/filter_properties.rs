use incident_core::{filter_incidents, Incident, Status, StatusFilter};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn status() -> impl Strategy<Value = Status> {
    prop_oneof![Just(Status::Investigating), Just(Status::Resolved)]
}

fn status_filter() -> impl Strategy<Value = StatusFilter> {
    prop_oneof![
        Just(StatusFilter::All),
        status().prop_map(StatusFilter::Only),
    ]
}

fn incidents() -> impl Strategy<Value = Vec<Incident>> {
    prop::collection::vec(
        (
            -500_i64..500,
            "[A-Za-z ]{0,8}",
            "[A-Za-z0-9 ]{0,8}",
            "[A-Za-z]{0,8}",
            status(),
        ),
        0..12,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(n, (id, kind, location, method, status))| Incident {
                id: id * 16 + n as i64,
                kind,
                location,
                method,
                time: "t".into(),
                status,
            })
            .collect()
    })
}

fn mentions(incident: &Incident, query: &str) -> bool {
    let q = query.to_lowercase();
    incident.id.to_string().contains(&q)
        || incident.kind.to_lowercase().contains(&q)
        || incident.location.to_lowercase().contains(&q)
        || incident.method.to_lowercase().contains(&q)
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn empty_query_with_all_is_identity(list in incidents()) {
        prop_assert_eq!(filter_incidents(&list, "", StatusFilter::All), list);
    }

    #[test]
    fn result_is_exactly_the_matching_subsequence(
        list in incidents(),
        query in "[A-Za-z0-9]{0,3}",
        filter in status_filter(),
    ) {
        let shown = filter_incidents(&list, &query, filter);
        let expected: Vec<Incident> = list
            .iter()
            .filter(|i| filter.matches(i.status) && mentions(i, &query))
            .cloned()
            .collect();
        prop_assert_eq!(shown, expected);
    }
}
