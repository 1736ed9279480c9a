pub mod mfapi;

pub use mfapi::MfapiAdapter;
