//! k1-ffi
//!
//! C ABI over the basis worksheet calculator and fill-in answer checking, for
//! mobile hosts that keep their own UI. Strings returned through out-parameters
//! are owned by the caller and must be released with [`k1_string_free`].

use std::{
    ffi::{CStr, CString},
    os::raw::{c_char, c_double, c_int},
    ptr,
};

use k1_core::{CoreError, WorksheetService};
use k1_domain::{rust_decimal::prelude::ToPrimitive, EntryDirection, InputField, Worksheet};

/// Opaque pointer used by external callers to hold worksheet state.
#[repr(C)]
pub struct WorksheetHandle {
    inner: Worksheet,
}

impl WorksheetHandle {
    fn new(worksheet: Worksheet) -> *mut Self {
        Box::into_raw(Box::new(Self { inner: worksheet }))
    }
}

/// Creates a worksheet. A null `initial_basis` starts from an empty value.
#[no_mangle]
pub extern "C" fn k1_worksheet_new(
    initial_basis: *const c_char,
    out_error: *mut *mut c_char,
) -> *mut WorksheetHandle {
    clear_error(out_error);
    let initial = if initial_basis.is_null() {
        String::new()
    } else {
        match unsafe { c_string_argument(initial_basis) } {
            Ok(value) => value,
            Err(err) => {
                unsafe {
                    write_core_error(out_error, err);
                }
                return ptr::null_mut();
            }
        }
    };
    WorksheetHandle::new(Worksheet::new(initial))
}

#[no_mangle]
pub extern "C" fn k1_worksheet_free(handle: *mut WorksheetHandle) {
    if handle.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(handle));
    }
}

#[no_mangle]
pub extern "C" fn k1_worksheet_set_starting_value(
    handle: *mut WorksheetHandle,
    value: *const c_char,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let Some(worksheet) = (unsafe { handle.as_mut() }).map(|h| &mut h.inner) else {
        unsafe {
            write_error(out_error, "worksheet handle is null");
        }
        return 1;
    };
    match unsafe { c_string_argument(value) } {
        Ok(value) => {
            WorksheetService::set_starting_value(worksheet, value);
            0
        }
        Err(err) => {
            unsafe {
                write_core_error(out_error, err);
            }
            2
        }
    }
}

/// Appends an entry. `direction_code` is 0 for increase and 1 for decrease.
/// On success the new entry id is written to `out_entry_id`.
#[no_mangle]
pub extern "C" fn k1_worksheet_add_entry(
    handle: *mut WorksheetHandle,
    direction_code: c_int,
    description: *const c_char,
    amount: *const c_char,
    out_entry_id: *mut *mut c_char,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let Some(worksheet) = (unsafe { handle.as_mut() }).map(|h| &mut h.inner) else {
        unsafe {
            write_error(out_error, "worksheet handle is null");
        }
        return 1;
    };
    let Some(direction) = direction_from_code(direction_code) else {
        unsafe {
            write_error(out_error, "direction must be 0 (increase) or 1 (decrease)");
        }
        return 2;
    };
    let description = match unsafe { optional_string_argument(description) } {
        Ok(value) => value,
        Err(err) => {
            unsafe {
                write_core_error(out_error, err);
            }
            return 3;
        }
    };
    let amount = match unsafe { optional_string_argument(amount) } {
        Ok(value) => value,
        Err(err) => {
            unsafe {
                write_core_error(out_error, err);
            }
            return 3;
        }
    };

    let id = WorksheetService::add_entry_with(worksheet, direction, description, amount);
    unsafe {
        write_string(out_entry_id, id);
    }
    0
}

#[no_mangle]
pub extern "C" fn k1_worksheet_remove_entry(
    handle: *mut WorksheetHandle,
    entry_id: *const c_char,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let Some(worksheet) = (unsafe { handle.as_mut() }).map(|h| &mut h.inner) else {
        unsafe {
            write_error(out_error, "worksheet handle is null");
        }
        return 1;
    };
    let result = unsafe { c_string_argument(entry_id) }
        .and_then(|id| WorksheetService::remove_entry(worksheet, &id));
    match result {
        Ok(_) => 0,
        Err(err) => {
            unsafe {
                write_core_error(out_error, err);
            }
            2
        }
    }
}

/// Writes the ending basis to `out_total` as the nearest double. Malformed
/// amounts count as zero.
#[no_mangle]
pub extern "C" fn k1_worksheet_total(
    handle: *const WorksheetHandle,
    out_total: *mut c_double,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    if handle.is_null() || out_total.is_null() {
        unsafe {
            write_error(out_error, "worksheet handle or output total is null");
        }
        return 1;
    }
    let worksheet = unsafe { &(*handle).inner };
    unsafe {
        *out_total = WorksheetService::total(worksheet).to_f64().unwrap_or(0.0);
    }
    0
}

/// 1 when the ending basis is below zero, 0 otherwise, -1 for a null handle.
#[no_mangle]
pub extern "C" fn k1_worksheet_is_negative(handle: *const WorksheetHandle) -> c_int {
    match unsafe { handle.as_ref() } {
        Some(handle) => c_int::from(WorksheetService::status(&handle.inner).is_invalid()),
        None => -1,
    }
}

/// 1 when `submitted`, trimmed, equals `expected` exactly; 0 otherwise.
#[no_mangle]
pub extern "C" fn k1_answer_matches(submitted: *const c_char, expected: *const c_char) -> c_int {
    let (Ok(submitted), Ok(expected)) = (unsafe {
        (
            c_string_argument(submitted),
            c_string_argument(expected),
        )
    }) else {
        return 0;
    };
    let field = InputField {
        id: String::new(),
        label: String::new(),
        expected,
    };
    c_int::from(field.accepts(&submitted))
}

/// Releases a string handed out by this library (errors and entry ids).
#[no_mangle]
pub extern "C" fn k1_string_free(value: *mut c_char) {
    if value.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(value));
    }
}

#[no_mangle]
pub extern "C" fn k1_error_free(error: *mut c_char) {
    k1_string_free(error);
}

fn direction_from_code(code: c_int) -> Option<EntryDirection> {
    match code {
        0 => Some(EntryDirection::Increase),
        1 => Some(EntryDirection::Decrease),
        _ => None,
    }
}

fn clear_error(out_error: *mut *mut c_char) {
    if out_error.is_null() {
        return;
    }
    unsafe {
        *out_error = ptr::null_mut();
    }
}

unsafe fn write_error(out_error: *mut *mut c_char, message: &str) {
    if out_error.is_null() {
        return;
    }
    if let Ok(cstring) = CString::new(message) {
        *out_error = cstring.into_raw();
    }
}

unsafe fn write_core_error(out_error: *mut *mut c_char, err: CoreError) {
    write_error(out_error, &err.to_string());
}

unsafe fn write_string(target: *mut *mut c_char, value: String) {
    if target.is_null() {
        return;
    }
    if let Ok(cstring) = CString::new(value) {
        *target = cstring.into_raw();
    }
}

unsafe fn c_string_argument(ptr: *const c_char) -> Result<String, CoreError> {
    if ptr.is_null() {
        return Err(CoreError::InvalidOperation(
            "null string pointer received".into(),
        ));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(|s| s.to_string())
        .map_err(|err| CoreError::InvalidOperation(err.to_string()))
}

unsafe fn optional_string_argument(ptr: *const c_char) -> Result<String, CoreError> {
    if ptr.is_null() {
        return Ok(String::new());
    }
    c_string_argument(ptr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(value: &str) -> CString {
        CString::new(value).unwrap()
    }

    #[test]
    fn worksheet_total_through_the_c_surface() {
        let mut error = ptr::null_mut();
        let start = c("50000");
        let handle = k1_worksheet_new(start.as_ptr(), &mut error);
        assert!(!handle.is_null());
        assert!(error.is_null());

        let mut entry_id = ptr::null_mut();
        let description = c("Distribution");
        let amount = c("60000");
        let status = k1_worksheet_add_entry(
            handle,
            1,
            description.as_ptr(),
            amount.as_ptr(),
            &mut entry_id,
            &mut error,
        );
        assert_eq!(status, 0);
        assert!(!entry_id.is_null());

        let mut total = 0.0;
        assert_eq!(k1_worksheet_total(handle, &mut total, &mut error), 0);
        assert_eq!(total, -10000.0);
        assert_eq!(k1_worksheet_is_negative(handle), 1);

        assert_eq!(k1_worksheet_remove_entry(handle, entry_id, &mut error), 0);
        assert_eq!(k1_worksheet_is_negative(handle), 0);

        k1_string_free(entry_id);
        k1_worksheet_free(handle);
    }

    #[test]
    fn bad_arguments_report_errors() {
        let mut error = ptr::null_mut();
        let handle = k1_worksheet_new(ptr::null(), &mut error);
        let status =
            k1_worksheet_add_entry(handle, 7, ptr::null(), ptr::null(), ptr::null_mut(), &mut error);
        assert_eq!(status, 2);
        assert!(!error.is_null());
        let message = unsafe { CStr::from_ptr(error) }.to_str().unwrap().to_string();
        assert!(message.contains("direction"));
        k1_error_free(error);

        let mut total = 0.0;
        assert_eq!(k1_worksheet_total(ptr::null(), &mut total, &mut error), 1);
        k1_error_free(error);
        assert_eq!(k1_worksheet_is_negative(ptr::null()), -1);
        k1_worksheet_free(handle);
    }

    #[test]
    fn answers_compare_exactly_after_trimming() {
        let expected = c("40000");
        assert_eq!(k1_answer_matches(c(" 40000 ").as_ptr(), expected.as_ptr()), 1);
        assert_eq!(k1_answer_matches(c("40,000").as_ptr(), expected.as_ptr()), 0);
        assert_eq!(k1_answer_matches(ptr::null(), expected.as_ptr()), 0);
    }
}
