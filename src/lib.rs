// Copyright (c) by hillsweep developers
//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod Examples;
pub mod Utils;
pub mod model;
pub mod numerical;
pub mod sweep;
