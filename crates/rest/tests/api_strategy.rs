//! REST API behaviour tests.
//!
//! Tests the API conventions every endpoint shares:
//! - Relation expansion (`expand`)
//! - Field selection (`fields`)
//! - Filtering, sorting (`sorteer`) and searching (`zoek`)
//! - Error bodies, status codes and headers

mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use serde_json::{Value, json};

use common::harness::{BASE_URL, RestTestHarness, keys_in_order};

const ACCEPT: HeaderName = HeaderName::from_static("accept");
const API_VERSION: HeaderName = HeaderName::from_static("api-version");

fn url(path: &str) -> String {
    format!("{BASE_URL}{path}")
}

// =============================================================================
// Representation
// =============================================================================

mod representation {
    use super::*;

    #[tokio::test]
    async fn test_catalogus_detail_has_no_envelope() {
        let harness = RestTestHarness::new();
        let body = harness.get_json("/catalogussen/1").await;

        assert_eq!(body["url"], url("/catalogussen/1"));
        assert_eq!(body["domein"], "ABCDE");
        assert_eq!(body["contactpersoon_beheer_naam"], "Ad Alarm");
        assert_eq!(body["besluittypen"], url("/catalogussen/1/besluittypen"));
        assert!(body.get("results").is_none());
    }

    #[tokio::test]
    async fn test_canonical_key_order() {
        let harness = RestTestHarness::new();
        let response = harness.get("/catalogussen/1").await;
        response.assert_status_ok();

        assert!(keys_in_order(
            &response.text(),
            &[
                "url",
                "domein",
                "rsin",
                "contactpersoon_beheer_naam",
                "besluittypen",
                "informatieobjecttypen",
                "eigenschappen",
            ]
        ));
    }

    #[tokio::test]
    async fn test_compact_json() {
        let harness = RestTestHarness::new();
        let response = harness.get("/catalogussen").await;
        response.assert_status_ok();

        let text = response.text();
        assert!(text.starts_with("{\"results\":["));
        assert!(!text.contains('\n'));
        assert!(!text.contains("\": "));
    }

    #[tokio::test]
    async fn test_besluittype_links() {
        let harness = RestTestHarness::new();
        let body = harness.get_json("/catalogussen/1/besluittypen/11").await;

        assert_eq!(body["maakt_deel_uit_van"], url("/catalogussen/1"));
        assert_eq!(
            body["wordt_vastgelegd_in"],
            json!([
                url("/catalogussen/1/informatieobjecttypen/20"),
                url("/catalogussen/1/informatieobjecttypen/21"),
            ])
        );
        assert_eq!(body["publicatie_indicatie"], "N");
        assert_eq!(body["publicatietermijn"], Value::Null);
    }

    #[tokio::test]
    async fn test_informatieobjecttype_reverse_links() {
        let harness = RestTestHarness::new();
        let body = harness
            .get_json("/catalogussen/1/informatieobjecttypen/20")
            .await;

        assert_eq!(body["maaktDeeluitVan"], url("/catalogussen/1"));
        assert_eq!(
            body["isVastleggingVoor"],
            json!([
                url("/catalogussen/1/besluittypen/10"),
                url("/catalogussen/1/besluittypen/11"),
            ])
        );
        assert_eq!(body["vertrouwelijkAanduiding"], "openbaar");
        assert_eq!(body["trefwoord"], json!(["brief", "besluit"]));
    }

    #[tokio::test]
    async fn test_eigenschap_sub_resource_links() {
        let harness = RestTestHarness::new();
        let body = harness.get_json("/catalogussen/1/eigenschappen/31").await;

        assert_eq!(body["specificatie_van_eigenschap"], Value::Null);
        assert_eq!(
            body["referentie_naar_eigenschap"],
            url("/catalogussen/1/eigenschappen/31#referentie")
        );
    }

    #[tokio::test]
    async fn test_list_envelope() {
        let harness = RestTestHarness::new();
        let results = harness.get_results("/catalogussen/1/eigenschappen").await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["eigenschapnaam"], "Aard bouwwerk");
    }

    #[tokio::test]
    async fn test_empty_list() {
        let harness = RestTestHarness::new();
        let results = harness.get_results("/catalogussen/2/besluittypen").await;
        assert!(results.is_empty());
    }
}

// =============================================================================
// Expansion
// =============================================================================

mod expansion {
    use super::*;

    #[tokio::test]
    async fn test_expand_all() {
        let harness = RestTestHarness::new();
        let body = harness.get_json("/catalogussen/1?expand=true").await;

        let besluittypen = body["besluittypen"].as_array().unwrap();
        assert_eq!(besluittypen.len(), 2);
        assert_eq!(besluittypen[0]["besluittype_omschrijving"], "Vergunningverlening");
        // One level only: the embedded items keep their own links
        assert_eq!(besluittypen[0]["maakt_deel_uit_van"], url("/catalogussen/1"));
        assert_eq!(body["eigenschappen"].as_array().unwrap().len(), 2);
        assert_eq!(body["informatieobjecttypen"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_expand_single_relation() {
        let harness = RestTestHarness::new();
        let body = harness.get_json("/catalogussen/1?expand=besluittypen").await;

        assert!(body["besluittypen"].is_array());
        assert_eq!(
            body["informatieobjecttypen"],
            url("/catalogussen/1/informatieobjecttypen")
        );
    }

    #[tokio::test]
    async fn test_expand_with_nested_field() {
        let harness = RestTestHarness::new();
        let body = harness
            .get_json("/catalogussen/1?expand=besluittypen.besluittype_omschrijving")
            .await;

        assert_eq!(
            body["besluittypen"],
            json!([
                {"besluittype_omschrijving": "Vergunningverlening"},
                {"besluittype_omschrijving": "Weigering"},
            ])
        );
    }

    #[tokio::test]
    async fn test_expand_nested_relation() {
        let harness = RestTestHarness::new();
        let body = harness
            .get_json(
                "/catalogussen/1/besluittypen/10?expand=maakt_deel_uit_van,wordt_vastgelegd_in.omschrijving",
            )
            .await;

        assert_eq!(body["maakt_deel_uit_van"]["domein"], "ABCDE");
        assert_eq!(body["wordt_vastgelegd_in"], json!([{"omschrijving": "Besluitbrief"}]));
    }

    #[tokio::test]
    async fn test_expand_on_list() {
        let harness = RestTestHarness::new();
        let results = harness
            .get_results("/catalogussen/1/eigenschappen?expand=specificatie_van_eigenschap.formaat")
            .await;

        assert_eq!(results[0]["specificatie_van_eigenschap"], json!({"formaat": "tekst"}));
        assert_eq!(results[1]["specificatie_van_eigenschap"], Value::Null);
    }

    #[tokio::test]
    async fn test_expand_unknown_relation() {
        let harness = RestTestHarness::new();
        let response = harness.get("/catalogussen/1?expand=zaaktypen").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["invalidParams"][0]["name"], "zaaktypen");
    }

    #[tokio::test]
    async fn test_expand_scalar_field_is_rejected() {
        let harness = RestTestHarness::new();
        let response = harness.get("/catalogussen/1?expand=domein").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_expand_not_expandable() {
        let harness = RestTestHarness::new();
        let response = harness
            .get("/catalogussen/1/eigenschappen/30?expand=maakt_deel_uit_van")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_expand_too_deep() {
        let harness = RestTestHarness::new();
        let response = harness
            .get("/catalogussen/1?expand=besluittypen.maakt_deel_uit_van.besluittypen.maakt_deel_uit_van")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_expand_unknown_field_below_empty_relation() {
        let harness = RestTestHarness::new();
        let response = harness.get("/catalogussen/2?expand=besluittypen.foobar").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["invalidParams"][0]["name"], "besluittypen.foobar");
    }

    #[tokio::test]
    async fn test_expand_unknown_field_below_absent_relation() {
        let harness = RestTestHarness::new();
        let response = harness
            .get("/catalogussen/1/eigenschappen/31?expand=specificatie_van_eigenschap.foobar")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["invalidParams"][0]["name"], "specificatie_van_eigenschap.foobar");
    }
}

// =============================================================================
// Field selection
// =============================================================================

mod fields {
    use super::*;

    #[tokio::test]
    async fn test_single_field() {
        let harness = RestTestHarness::new();
        let body = harness.get_json("/catalogussen/1?fields=domein").await;
        assert_eq!(body, json!({"domein": "ABCDE"}));
    }

    #[tokio::test]
    async fn test_fields_keep_canonical_order() {
        let harness = RestTestHarness::new();
        let response = harness.get("/catalogussen/1?fields=rsin,domein").await;
        response.assert_status_ok();

        let text = response.text();
        assert!(keys_in_order(&text, &["domein", "rsin"]));
        assert_eq!(
            response.json::<Value>(),
            json!({"domein": "ABCDE", "rsin": "000000000"})
        );
    }

    #[tokio::test]
    async fn test_fields_on_list() {
        let harness = RestTestHarness::new();
        let results = harness.get_results("/catalogussen?fields=domein").await;
        assert_eq!(results, vec![json!({"domein": "ABCDE"}), json!({"domein": "FGHIJ"})]);
    }

    #[tokio::test]
    async fn test_fields_with_expansion() {
        let harness = RestTestHarness::new();
        let body = harness
            .get_json("/catalogussen/1?fields=domein,eigenschappen&expand=eigenschappen.eigenschapnaam")
            .await;

        assert_eq!(
            body,
            json!({
                "domein": "ABCDE",
                "eigenschappen": [
                    {"eigenschapnaam": "Aard bouwwerk"},
                    {"eigenschapnaam": "Kenmerk"},
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_field() {
        let harness = RestTestHarness::new();
        let response = harness.get("/catalogussen/1?fields=foobar").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.header("content-type"),
            HeaderValue::from_static("application/problem+json")
        );
        let body = response.json::<Value>();
        assert_eq!(body["status"], 400);
        assert_eq!(body["invalidParams"][0]["name"], "foobar");
    }

    #[tokio::test]
    async fn test_unknown_field_on_empty_collection() {
        let harness = RestTestHarness::new();
        let response = harness.get("/catalogussen/2/besluittypen?fields=foobar").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["invalidParams"][0]["name"], "foobar");
    }

    #[tokio::test]
    async fn test_unknown_field_checked_before_lookup() {
        let harness = RestTestHarness::new();
        let response = harness.get("/catalogussen/9?fields=foobar").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

// =============================================================================
// Filtering, sorting and searching
// =============================================================================

mod query {
    use super::*;

    #[tokio::test]
    async fn test_filter_rsin() {
        let harness = RestTestHarness::new();
        let results = harness.get_results("/catalogussen?rsin=111111111").await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["domein"], "FGHIJ");
    }

    #[tokio::test]
    async fn test_filter_domein_and_rsin() {
        let harness = RestTestHarness::new();
        let results = harness
            .get_results("/catalogussen?domein=ABCDE&rsin=111111111")
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_filter_nested_collection() {
        let harness = RestTestHarness::new();
        let results = harness
            .get_results("/catalogussen/1/besluittypen?publicatie_indicatie=J")
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["besluittype_omschrijving"], "Vergunningverlening");
    }

    #[tokio::test]
    async fn test_unknown_filter() {
        let harness = RestTestHarness::new();
        let response = harness.get("/catalogussen?foo=bar").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["invalidParams"][0]["name"], "foo");
    }

    #[tokio::test]
    async fn test_sort_descending() {
        let harness = RestTestHarness::new();
        let results = harness.get_results("/catalogussen?sorteer=-domein").await;

        assert_eq!(results[0]["domein"], "FGHIJ");
        assert_eq!(results[1]["domein"], "ABCDE");
    }

    #[tokio::test]
    async fn test_sort_ascending() {
        let harness = RestTestHarness::new();
        let results = harness
            .get_results("/catalogussen/1/besluittypen?sorteer=besluittype_omschrijving")
            .await;

        assert_eq!(results[0]["besluittype_omschrijving"], "Vergunningverlening");
        assert_eq!(results[1]["besluittype_omschrijving"], "Weigering");
    }

    #[tokio::test]
    async fn test_sort_unknown_field() {
        let harness = RestTestHarness::new();
        let response = harness.get("/catalogussen?sorteer=foobar").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["invalidParams"][0]["name"], "sorteer");
    }

    #[tokio::test]
    async fn test_search() {
        let harness = RestTestHarness::new();
        let response = harness
            .server
            .get("/catalogussen")
            .add_query_param("zoek", "bea")
            .await;
        response.assert_status_ok();

        let results = response.json::<Value>()["results"].clone();
        assert_eq!(results.as_array().unwrap().len(), 1);
        assert_eq!(results[0]["contactpersoon_beheer_naam"], "Bea Bellen");
    }

    #[tokio::test]
    async fn test_search_terms_must_all_match() {
        let harness = RestTestHarness::new();
        let response = harness
            .server
            .get("/catalogussen")
            .add_query_param("zoek", "bea abcde")
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["results"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_field_with_empty_search_result() {
        let harness = RestTestHarness::new();
        let response = harness
            .server
            .get("/catalogussen")
            .add_query_param("zoek", "zzzz")
            .add_query_param("fields", "foobar")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["invalidParams"][0]["name"], "foobar");
    }

    #[tokio::test]
    async fn test_detail_ignores_list_parameters() {
        let harness = RestTestHarness::new();
        let body = harness.get_json("/catalogussen/1?rsin=111111111").await;
        assert_eq!(body["domein"], "ABCDE");
    }
}

// =============================================================================
// Status codes and headers
// =============================================================================

mod protocol {
    use super::*;

    #[tokio::test]
    async fn test_api_version_header() {
        let harness = RestTestHarness::new();

        let response = harness.get("/catalogussen").await;
        assert_eq!(response.header(API_VERSION), HeaderValue::from_static("1.0.0"));

        let response = harness.get("/catalogussen/9").await;
        response.assert_status_not_found();
        assert_eq!(response.header(API_VERSION), HeaderValue::from_static("1.0.0"));
    }

    #[tokio::test]
    async fn test_configured_api_version() {
        let config = ztc_rest::ServerConfig {
            api_version: "1.2.3".to_string(),
            ..ztc_rest::ServerConfig::for_testing()
        };
        let harness = RestTestHarness::with_config(config);

        let response = harness.get("/catalogussen").await;
        assert_eq!(response.header(API_VERSION), HeaderValue::from_static("1.2.3"));
    }

    #[tokio::test]
    async fn test_not_acceptable() {
        let harness = RestTestHarness::new();
        let response = harness
            .server
            .get("/catalogussen")
            .add_header(ACCEPT, HeaderValue::from_static("text/html"))
            .await;

        response.assert_status(StatusCode::NOT_ACCEPTABLE);
        assert_eq!(response.header(API_VERSION), HeaderValue::from_static("1.0.0"));
    }

    #[tokio::test]
    async fn test_json_accepted() {
        let harness = RestTestHarness::new();
        let response = harness
            .server
            .get("/catalogussen")
            .add_header(ACCEPT, HeaderValue::from_static("application/json"))
            .await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_not_found() {
        let harness = RestTestHarness::new();

        for path in [
            "/catalogussen/9",
            "/catalogussen/abc",
            "/catalogussen/9/besluittypen",
            "/catalogussen/1/zaaktypen",
            "/catalogussen/1/catalogussen",
            "/catalogussen/1/besluittypen/99",
            "/catalogussen/2/besluittypen/10",
            "/zaaktypen",
        ] {
            let response = harness.get(path).await;
            assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "{path}");
            assert_eq!(response.json::<Value>()["status"], 404, "{path}");
        }
    }

    #[tokio::test]
    async fn test_health() {
        let harness = RestTestHarness::new();
        let body = harness.get_json("/health").await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["backend"], "memory");
        assert_eq!(body["catalogussen"], 2);
    }
}
