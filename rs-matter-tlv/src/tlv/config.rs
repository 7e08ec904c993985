/*
 *
 *    Copyright (c) 2020-2022 Project CHIP Authors
 *
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

/// What to do when the same context tag appears twice in one structure.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DuplicateTagPolicy {
    /// Duplicates are passed through; it is up to the consumer to decide.
    #[default]
    Allow,
    /// Duplicates fail with `ErrorCode::DuplicateTag`.
    Reject,
}

/// Validation knobs shared by `TLVWriter` and `TLVReader`.
///
/// The maximum container depth is not configurable: it is always `MAX_CONTAINER_DEPTH`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TLVConfig {
    pub duplicate_tags: DuplicateTagPolicy,
    /// Require anonymous tags inside arrays and non-anonymous tags inside structures.
    pub strict_tags: bool,
}

impl TLVConfig {
    pub const fn new() -> Self {
        Self {
            duplicate_tags: DuplicateTagPolicy::Allow,
            strict_tags: true,
        }
    }

    pub const fn with_duplicate_tags(mut self, policy: DuplicateTagPolicy) -> Self {
        self.duplicate_tags = policy;
        self
    }

    pub const fn with_strict_tags(mut self, strict: bool) -> Self {
        self.strict_tags = strict;
        self
    }
}

impl Default for TLVConfig {
    fn default() -> Self {
        Self::new()
    }
}
