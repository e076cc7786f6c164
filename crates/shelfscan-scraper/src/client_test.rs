use super::*;

#[test]
fn request_url_appends_params_in_order() {
    let params = items_params(&CategoryId::Numeric(7), 200, 50);
    let url = request_url("https://api.example.com/v1/items", &params).unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.example.com/v1/items?limit=50&offset=200&sort_type=popular&category_id=7"
    );
}

#[test]
fn request_url_keeps_existing_query() {
    let url = request_url(
        "https://api.example.com/v1/items?lang=ru",
        &[("limit", "1".to_owned())],
    )
    .unwrap();
    assert_eq!(url.as_str(), "https://api.example.com/v1/items?lang=ru&limit=1");
}

#[test]
fn request_url_without_params_is_unchanged() {
    let url = request_url("https://api.example.com/v1/categories", &[]).unwrap();
    assert_eq!(url.as_str(), "https://api.example.com/v1/categories");
}

#[test]
fn request_url_rejects_invalid_url() {
    let err = request_url("not-a-url", &[]).unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidUrl { .. }),
        "expected InvalidUrl, got: {err:?}"
    );
}

#[test]
fn format_params_joins_pairs() {
    let params = items_params(&CategoryId::Numeric(3), 0, 1);
    assert_eq!(
        format_params(&params),
        "limit=1&offset=0&sort_type=popular&category_id=3"
    );
    assert_eq!(format_params(&[]), "");
}

#[test]
fn encode_town_escapes_non_ascii() {
    assert_eq!(encode_town("Москва"), "%D0%9C%D0%BE%D1%81%D0%BA%D0%B2%D0%B0");
    assert_eq!(encode_town("Nizhny Novgorod"), "Nizhny%20Novgorod");
    assert_eq!(encode_town("a-b_c.d~e/f"), "a-b_c.d~e/f");
}

#[test]
fn geo_headers_carry_encoded_town_and_region() {
    let map = headers::geo_headers("Тула", "71").unwrap();
    assert_eq!(
        map.get(GEO_TOWN_HEADER).unwrap(),
        "%D0%A2%D1%83%D0%BB%D0%B0"
    );
    assert_eq!(map.get(GEO_TOWN_ID_HEADER).unwrap(), "71");
}

#[test]
fn geo_headers_reject_control_characters_in_region() {
    let err = headers::geo_headers("Тула", "71\n").unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidHeader { ref name, .. } if name == GEO_TOWN_ID_HEADER),
        "expected InvalidHeader, got: {err:?}"
    );
}

#[test]
fn with_http_rejects_invalid_items_url() {
    let result = CatalogClient::with_http(
        Client::new(),
        "items",
        RetryPolicy::without_delay(1),
        TokioSleeper,
    );
    assert!(matches!(result, Err(ScraperError::InvalidUrl { .. })));
}
