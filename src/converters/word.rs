//! Microsoft Word automation over COM, driven in process.
//!
//! Each export enters a single-threaded apartment on the calling thread,
//! talks to `Word.Application` through `IDispatch`, and leaves the apartment
//! when it returns. All interface pointers are released before that.

use crate::error::{ConvertError, Result};
use log::{debug, warn};
use std::path::Path;
use std::ptr;
use windows::Win32::Foundation::S_OK;
use windows::Win32::System::Com::{
    CLSCTX_LOCAL_SERVER, CLSIDFromProgID, COINIT_APARTMENTTHREADED, CoCreateInstance,
    CoInitializeEx, CoUninitialize, DISPATCH_FLAGS, DISPATCH_METHOD, DISPATCH_PROPERTYGET,
    DISPATCH_PROPERTYPUT, DISPPARAMS, IDispatch,
};
use windows::Win32::System::Ole::DISPID_PROPERTYPUT;
use windows::Win32::System::Variant::VT_DISPATCH;
use windows::core::{BSTR, GUID, HSTRING, Interface, PCWSTR, VARIANT, w};

const LOCALE_USER_DEFAULT: u32 = 0x0400;

/// `WdSaveFormat.wdFormatPDF`
const WD_FORMAT_PDF: i32 = 17;

/// `WdSaveOptions.wdDoNotSaveChanges`
const WD_DO_NOT_SAVE_CHANGES: i32 = 0;

/// Exports `source` to PDF at `destination` with a private Word instance.
pub fn export_pdf(source: &Path, destination: &Path) -> Result<()> {
    let _apartment = ComApartment::enter();
    let word = launch_word()?;

    let result = save_as_pdf(&word, source, destination);
    if let Err(e) = word.call("Quit", vec![VARIANT::from(WD_DO_NOT_SAVE_CHANGES)]) {
        warn!("Word did not quit cleanly: {}", e);
    }
    result
}

fn launch_word() -> Result<Automation> {
    let clsid = unsafe { CLSIDFromProgID(w!("Word.Application")) }
        .map_err(|_| ConvertError::HostUnavailable("Microsoft Word is not installed".to_string()))?;
    let app: IDispatch = unsafe { CoCreateInstance(&clsid, None, CLSCTX_LOCAL_SERVER) }
        .map_err(|e| ConvertError::HostUnavailable(format!("Microsoft Word did not start: {}", e)))?;

    let word = Automation(app);
    word.put("DisplayAlerts", VARIANT::from(0i32))?;
    debug!("Word automation started");
    Ok(word)
}

fn save_as_pdf(word: &Automation, source: &Path, destination: &Path) -> Result<()> {
    let documents = word.get("Documents")?;
    let opened = documents.call(
        "Open",
        vec![path_variant(source)?, VARIANT::from(false), VARIANT::from(true)],
    )?;
    let document = Automation::from_variant("Documents.Open", &opened)?;

    let saved = document.call(
        "SaveAs2",
        vec![path_variant(destination)?, VARIANT::from(WD_FORMAT_PDF)],
    );
    if let Err(e) = document.call("Close", vec![VARIANT::from(WD_DO_NOT_SAVE_CHANGES)]) {
        warn!("Word did not close the document: {}", e);
    }
    saved.map(drop)
}

fn path_variant(path: &Path) -> Result<VARIANT> {
    let text = path
        .to_str()
        .ok_or_else(|| ConvertError::InvalidInput(path.to_path_buf()))?;
    Ok(VARIANT::from(BSTR::from(text)))
}

fn com_error(member: &str, err: windows::core::Error) -> ConvertError {
    ConvertError::HostUnavailable(format!("Word call {} failed: {}", member, err))
}

/// Late-bound calls on an automation object.
struct Automation(IDispatch);

impl Automation {
    /// Takes the object out of a `VT_DISPATCH` result.
    fn from_variant(member: &str, value: &VARIANT) -> Result<Self> {
        let raw = value.as_raw();
        let dispatch = unsafe {
            if raw.Anonymous.Anonymous.vt != VT_DISPATCH.0 {
                None
            } else {
                IDispatch::from_raw_borrowed(&raw.Anonymous.Anonymous.Anonymous.pdispVal).cloned()
            }
        };
        dispatch.map(Automation).ok_or_else(|| {
            ConvertError::HostUnavailable(format!("Word returned no object from {}", member))
        })
    }

    fn dispid(&self, member: &str) -> Result<i32> {
        let name = HSTRING::from(member);
        let names = [PCWSTR(name.as_ptr())];
        let mut dispid = 0;
        unsafe {
            self.0
                .GetIDsOfNames(&GUID::zeroed(), names.as_ptr(), 1, LOCALE_USER_DEFAULT, &mut dispid)
        }
        .map_err(|e| com_error(member, e))?;
        Ok(dispid)
    }

    fn invoke(&self, member: &str, flags: DISPATCH_FLAGS, mut args: Vec<VARIANT>) -> Result<VARIANT> {
        let dispid = self.dispid(member)?;
        // IDispatch takes positional arguments last to first.
        args.reverse();

        let is_put = flags == DISPATCH_PROPERTYPUT;
        let mut named_arg = DISPID_PROPERTYPUT;
        let params = DISPPARAMS {
            rgvarg: args.as_mut_ptr(),
            rgdispidNamedArgs: if is_put {
                &mut named_arg as *mut i32
            } else {
                ptr::null_mut()
            },
            cArgs: args.len() as u32,
            cNamedArgs: u32::from(is_put),
        };

        let mut result = VARIANT::default();
        unsafe {
            self.0.Invoke(
                dispid,
                &GUID::zeroed(),
                LOCALE_USER_DEFAULT,
                flags,
                &params,
                Some(&mut result as *mut VARIANT),
                None,
                None,
            )
        }
        .map_err(|e| com_error(member, e))?;
        Ok(result)
    }

    fn call(&self, member: &str, args: Vec<VARIANT>) -> Result<VARIANT> {
        self.invoke(member, DISPATCH_METHOD, args)
    }

    fn get(&self, member: &str) -> Result<Automation> {
        let value = self.invoke(member, DISPATCH_PROPERTYGET, Vec::new())?;
        Self::from_variant(member, &value)
    }

    fn put(&self, member: &str, value: VARIANT) -> Result<()> {
        self.invoke(member, DISPATCH_PROPERTYPUT, vec![value]).map(drop)
    }
}

/// Per-call COM apartment for the current thread.
///
/// Uninitialises on drop, so the apartment is torn down on every return path.
struct ComApartment {
    initialized: bool,
    /// `false` when the thread already had an apartment (`S_FALSE`).
    fresh: bool,
}

impl ComApartment {
    fn enter() -> Self {
        // S_FALSE (already initialised) still needs a matching CoUninitialize.
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        if hr.is_err() {
            warn!("CoInitializeEx failed: {:?}", hr);
        }
        debug!("COM apartment entered");
        Self {
            initialized: hr.is_ok(),
            fresh: hr == S_OK,
        }
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.initialized {
            unsafe { CoUninitialize() };
            debug!("COM apartment left (owned: {})", self.fresh);
        }
    }
}
