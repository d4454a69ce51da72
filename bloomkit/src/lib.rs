// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! # bloomkit
//!
//! Bloom filters sized against a proven false positive bound, built on a bounds-checked bit
//! vector and a choice of digest-based hash strategies.
//!
//! This library is divided into modules that constitute distinct groups of functionality:
//!
//! - [`bloom`]: the filter, its builder, and the capacity planner
//! - [`hash`]: hash strategies producing the `k` hash functions of a filter
//! - [`common`]: the bit vector storage primitive
//! - [`error`]: the error type shared by all modules

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod bloom;
pub mod common;
pub mod error;
pub mod hash;
