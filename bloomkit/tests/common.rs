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

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Distinct string items `"{prefix}{i}"` for `i` in `0..count`.
pub fn distinct_items(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i}")).collect()
}

/// Fraction of `probes` reported as members by `contains`.
pub fn observed_fpr(probes: &[String], contains: impl Fn(&str) -> bool) -> f64 {
    let hits = probes.iter().filter(|probe| contains(probe.as_str())).count();
    hits as f64 / probes.len() as f64
}
