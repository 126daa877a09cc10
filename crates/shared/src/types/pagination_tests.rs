use super::*;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.limit, 10);
    assert!(request.search.is_none());
}

#[test]
fn test_page_request_normalized_clamps() {
    let request = PageRequest {
        page: 0,
        limit: 100_000,
        search: Some("   ".to_string()),
        ..PageRequest::default()
    }
    .normalized();

    assert_eq!(request.page, 1);
    assert_eq!(request.limit, MAX_LIMIT);
    assert!(request.search.is_none());
}

#[test]
fn test_page_request_normalized_trims_search() {
    let request = PageRequest {
        search: Some("  infy ".to_string()),
        ..PageRequest::default()
    }
    .normalized();
    assert_eq!(request.search.as_deref(), Some("infy"));
}

#[test]
fn test_page_request_deserializes_sort_order() {
    let request: PageRequest =
        serde_json::from_str(r#"{"page":2,"limit":25,"sort_order":"desc"}"#).unwrap();
    assert_eq!(request.page, 2);
    assert_eq!(request.limit, 25);
    assert_eq!(request.sort_order, Some(SortOrder::Desc));
}

#[test]
fn test_page_response_new() {
    let data = vec![1, 2, 3];
    let response = PageResponse::new(data.clone(), 1, 10, 3);

    assert_eq!(response.data, data);
    assert_eq!(response.meta.page, 1);
    assert_eq!(response.meta.limit, 10);
    assert_eq!(response.meta.total, 3);
    assert_eq!(response.meta.total_pages, 1);
}

#[test]
fn test_page_response_pagination() {
    // 25 items, 10 per page -> 3 pages
    let response: PageResponse<i32> = PageResponse::new(vec![], 1, 10, 25);
    assert_eq!(response.meta.total_pages, 3);
}

#[test]
fn test_page_response_empty() {
    let response: PageResponse<i32> = PageResponse::new(vec![], 1, 10, 0);
    assert_eq!(response.meta.total_pages, 1);
}
