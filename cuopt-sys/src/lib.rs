#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(dead_code)]

//! Low-level FFI bindings to the cuOpt linear programming C API
//!
//! This crate provides unsafe FFI bindings generated from `cuopt_c.h`.
//! For safe bindings, use the `cuopt` crate instead.

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
