//! C-ABI wrapper around `catalog-core`.
//!
//! # Overview
//! Exposes the catalog client, favorites encoding and name search through
//! `extern "C"` functions so a native mobile host can build requests, run
//! them with its own HTTP stack, and hand the responses back for parsing.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-endpoint `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiCatalogResult` envelope with `FfiDataTag` + JSON text
//!   conveys success payloads and errors uniformly.
//! - Favorites stay in host storage: the host passes the stored string in
//!   and persists the string it gets back.
//! - The C caller owns all returned pointers and must call the matching
//!   `catalog_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use catalog_core::{
    filter_by_name, CatalogClient, CatalogError, CatalogPage, Character, EntityId, Episode,
    FavoritesSet, HttpResponse, Location, Resource, ResourceKind,
};
use serde_json::json;

use types::*;

/// Borrow a C string as `&str`; invalid UTF-8 reads as empty.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string that outlives
/// the returned reference.
unsafe fn str_arg<'a>(ptr: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `CatalogClient` bound to `base_url` (e.g.
/// `https://rickandmortyapi.com/api`).
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `catalog_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_client_new(base_url: *const c_char) -> *mut FfiCatalogClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { str_arg(base_url) };
        let client = CatalogClient::new(url);
        Box::into_raw(Box::new(FfiCatalogClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `catalog_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_client_free(client: *mut FfiCatalogClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the request for one list page (pages start at 1).
///
/// Returns null if `client` is null or `page` is 0.
/// The caller must free the returned pointer with `catalog_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_build_list_page(
    client: *const FfiCatalogClient,
    kind: FfiResourceKind,
    page: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || page == 0 {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_page(kind.into(), page))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for a single entity.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_build_detail(
    client: *const FfiCatalogClient,
    kind: FfiResourceKind,
    id: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_detail(kind.into(), id))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the batched character request for `ids[0..len]`.
///
/// Returns null if `client` or `ids` is null or `len` is 0; there is
/// nothing to fetch for an empty batch.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_build_characters_by_ids(
    client: *const FfiCatalogClient,
    ids: *const u32,
    len: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || ids.is_null() || len == 0 {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let ids: &[EntityId] = unsafe { std::slice::from_raw_parts(ids, len as usize) };
        match client.inner.build_characters_by_ids(ids) {
            Some(req) => FfiHttpRequest::from_core(req),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body reads
/// as an empty string.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { str_arg(resp.body) }.to_string()
    };
    HttpResponse::new(resp.status, body)
}

fn page_json<T: Resource>(
    client: &CatalogClient,
    page: u32,
    response: HttpResponse,
) -> Result<String, CatalogError> {
    let page: CatalogPage<T> = client.parse_list_page(page, response)?;
    Ok(json!({
        "results": page.results,
        "has_next": page.has_next(),
        "next_page": page.next_page,
    })
    .to_string())
}

fn detail_json<T: Resource>(
    client: &CatalogClient,
    response: HttpResponse,
) -> Result<String, CatalogError> {
    let entity: T = client.parse_detail(response)?;
    Ok(serde_json::to_string(&entity)?)
}

/// Parse the response to a `catalog_build_list_page` request for `page`.
///
/// Returns a result with `data_tag = Page` on success.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_parse_list_page(
    client: *const FfiCatalogClient,
    kind: FfiResourceKind,
    page: u32,
    response: *const FfiHttpResponse,
) -> *mut FfiCatalogResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiCatalogResult::null_arg("client");
        }
        if response.is_null() {
            return FfiCatalogResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let core_resp = ffi_response_to_core(unsafe { &*response });
        let outcome = match ResourceKind::from(kind) {
            ResourceKind::Character => page_json::<Character>(&client.inner, page, core_resp),
            ResourceKind::Episode => page_json::<Episode>(&client.inner, page, core_resp),
            ResourceKind::Location => page_json::<Location>(&client.inner, page, core_resp),
        };
        match outcome {
            Ok(json) => FfiCatalogResult::ok_json(FfiDataTag::Page, json),
            Err(e) => FfiCatalogResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiCatalogResult::panic("panic in catalog_parse_list_page"))
}

/// Parse the response to a `catalog_build_detail` request.
///
/// Returns a result with `data_tag = Entity` on success and
/// `error_code = NotFound` when the entity does not exist.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_parse_detail(
    client: *const FfiCatalogClient,
    kind: FfiResourceKind,
    response: *const FfiHttpResponse,
) -> *mut FfiCatalogResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiCatalogResult::null_arg("client");
        }
        if response.is_null() {
            return FfiCatalogResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let core_resp = ffi_response_to_core(unsafe { &*response });
        let outcome = match ResourceKind::from(kind) {
            ResourceKind::Character => detail_json::<Character>(&client.inner, core_resp),
            ResourceKind::Episode => detail_json::<Episode>(&client.inner, core_resp),
            ResourceKind::Location => detail_json::<Location>(&client.inner, core_resp),
        };
        match outcome {
            Ok(json) => FfiCatalogResult::ok_json(FfiDataTag::Entity, json),
            Err(e) => FfiCatalogResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiCatalogResult::panic("panic in catalog_parse_detail"))
}

/// Parse the response to a `catalog_build_characters_by_ids` request.
///
/// Returns a result with `data_tag = EntityList` on success; a single-object
/// upstream reply comes back as a one-element array.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_parse_characters_by_ids(
    client: *const FfiCatalogClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCatalogResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiCatalogResult::null_arg("client");
        }
        if response.is_null() {
            return FfiCatalogResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let core_resp = ffi_response_to_core(unsafe { &*response });
        let outcome = client
            .inner
            .parse_characters_by_ids(core_resp)
            .and_then(|characters| Ok(serde_json::to_string(&characters)?));
        match outcome {
            Ok(json) => FfiCatalogResult::ok_json(FfiDataTag::EntityList, json),
            Err(e) => FfiCatalogResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiCatalogResult::panic("panic in catalog_parse_characters_by_ids"))
}

// ---------------------------------------------------------------------------
// Favorites and search
// ---------------------------------------------------------------------------

fn favorites_arg(stored: *const c_char) -> FavoritesSet {
    if stored.is_null() {
        FavoritesSet::default()
    } else {
        FavoritesSet::from_stored(unsafe { str_arg(stored) })
    }
}

/// Toggle `id` in the stored favorites value and return the new value to
/// persist. `stored` may be null (nothing persisted yet); malformed values
/// start from the empty list.
///
/// Returns null only if an internal panic occurs. Free the result with
/// `catalog_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_favorites_toggle(stored: *const c_char, id: u32) -> *mut c_char {
    catch_unwind(|| to_c_string(favorites_arg(stored).toggled(id).to_stored()))
        .unwrap_or(std::ptr::null_mut())
}

/// Whether `id` is in the stored favorites value. `stored` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_favorites_contains(stored: *const c_char, id: u32) -> bool {
    catch_unwind(|| favorites_arg(stored).contains(id)).unwrap_or(false)
}

fn filter_json<T: Resource>(list: &str, query: &str) -> Result<String, CatalogError> {
    let items: Vec<T> = serde_json::from_str(list)?;
    Ok(serde_json::to_string(&filter_by_name(&items, query))?)
}

/// Filter a JSON array of entities by case-insensitive name substring.
///
/// A null `query` behaves like the empty query and returns the whole list.
/// Returns a result with `data_tag = EntityList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_filter_by_name(
    kind: FfiResourceKind,
    list_json: *const c_char,
    query: *const c_char,
) -> *mut FfiCatalogResult {
    catch_unwind(|| {
        if list_json.is_null() {
            return FfiCatalogResult::null_arg("list_json");
        }
        let list = unsafe { str_arg(list_json) };
        let query = if query.is_null() { "" } else { unsafe { str_arg(query) } };
        let outcome = match ResourceKind::from(kind) {
            ResourceKind::Character => filter_json::<Character>(list, query),
            ResourceKind::Episode => filter_json::<Episode>(list, query),
            ResourceKind::Location => filter_json::<Location>(list, query),
        };
        match outcome {
            Ok(json) => FfiCatalogResult::ok_json(FfiDataTag::EntityList, json),
            Err(e) => FfiCatalogResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiCatalogResult::panic("panic in catalog_filter_by_name"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `catalog_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.path.is_null() {
            drop(unsafe { CString::from_raw(req.path) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers: Box<[FfiHeader]> = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiCatalogResult` returned by any parse or filter function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_free_result(result: *mut FfiCatalogResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.json.is_null() {
            drop(unsafe { CString::from_raw(result.json) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
