//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Requests mirror the core `HttpRequest` with C strings and raw arrays.
//! Parsed payloads cross as JSON text in the entity's wire shape, so hosts
//! reuse the decoders they already have instead of walking nested C structs.
//! Conversion functions live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use catalog_core::{CatalogError, ErrorKind, HttpMethod, ResourceKind};

/// Opaque handle to a `CatalogClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiCatalogClient {
    pub(crate) inner: catalog_core::CatalogClient,
}

/// Allocate a C string. Interior NULs (never produced by JSON encoding or
/// URLs built from C strings) degrade to an empty string.
pub(crate) fn to_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Resource collection as a C enum.
#[repr(C)]
#[derive(Clone, Copy)]
pub enum FfiResourceKind {
    Character = 0,
    Episode = 1,
    Location = 2,
}

impl From<FfiResourceKind> for ResourceKind {
    fn from(k: FfiResourceKind) -> Self {
        match k {
            FfiResourceKind::Character => ResourceKind::Character,
            FfiResourceKind::Episode => ResourceKind::Episode,
            FfiResourceKind::Location => ResourceKind::Location,
        }
    }
}

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `catalog_build_*` functions. The C caller executes the request
/// and passes the response back through `catalog_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: catalog_core::HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: to_c_string(req.path),
            headers,
            headers_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `catalog_parse_*` function. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiCatalogResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Network = 2,
    Parse = 3,
    Storage = 4,
    Config = 5,
    Panic = 6,
    NullArg = 7,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => FfiErrorCode::NotFound,
            ErrorKind::Network => FfiErrorCode::Network,
            ErrorKind::Parse => FfiErrorCode::Parse,
            ErrorKind::Storage => FfiErrorCode::Storage,
            ErrorKind::Config => FfiErrorCode::Config,
        }
    }
}

/// Shape of the JSON carried by a successful `FfiCatalogResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    /// `{"results": [...], "has_next": bool, "next_page": n | null}`
    Page = 1,
    /// One character, episode or location object.
    Entity = 2,
    /// Array of entity objects.
    EntityList = 3,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `json`
/// holds the payload described by `data_tag`. On failure `error_code`
/// describes the category, `error_message` is a human-readable C string,
/// and `json` is null.
#[repr(C)]
pub struct FfiCatalogResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub json: *mut c_char,
}

impl FfiCatalogResult {
    pub(crate) fn ok_json(data_tag: FfiDataTag, json: String) -> *mut Self {
        Box::into_raw(Box::new(FfiCatalogResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            json: to_c_string(json),
        }))
    }

    /// Build an error result from a `CatalogError`.
    pub(crate) fn from_error(err: CatalogError) -> *mut Self {
        Self::error(err.kind().into(), err.http_status().unwrap_or(0), &err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, &format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg)
    }

    fn error(error_code: FfiErrorCode, http_status: u16, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiCatalogResult {
            error_code,
            error_message: to_c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            json: std::ptr::null_mut(),
        }))
    }
}
