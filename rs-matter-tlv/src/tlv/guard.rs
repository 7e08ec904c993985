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

use log::{trace, warn};

use crate::error::{Error, ErrorCode};

use super::{DuplicateTagPolicy, TLVConfig, TLVContainerType, TLVTag};

/// The maximum number of simultaneously open containers,
/// for both encoding and decoding.
pub const MAX_CONTAINER_DEPTH: usize = 16;

/// Proof that a container was opened, required to close it again.
///
/// Tokens are neither `Clone` nor `Copy`, so a container cannot be closed twice
/// with the same token.
#[must_use = "the container must be closed with this token"]
#[derive(Debug, PartialEq, Eq)]
pub struct ContainerToken {
    depth: usize,
    kind: TLVContainerType,
}

impl ContainerToken {
    /// The nesting depth of the container (1 for a top-level container).
    pub const fn depth(&self) -> usize {
        self.depth
    }

    pub const fn kind(&self) -> TLVContainerType {
        self.kind
    }
}

/// A 256-bit set of the context tags already seen in one structure.
#[derive(Debug, Default, Clone)]
struct ContextTagSet([u32; 8]);

impl ContextTagSet {
    fn contains(&self, tag: u8) -> bool {
        self.0[tag as usize / 32] & (1 << (tag % 32)) != 0
    }

    fn insert(&mut self, tag: u8) {
        self.0[tag as usize / 32] |= 1 << (tag % 32);
    }
}

#[derive(Debug, Clone)]
struct Frame {
    kind: TLVContainerType,
    seen: ContextTagSet,
}

/// The explicit stack of open containers, shared by `TLVWriter` and `TLVReader`.
///
/// Besides bounding the depth, the guard checks tag legality of the elements
/// placed directly inside the innermost container.
#[derive(Debug)]
pub struct NestingGuard {
    config: TLVConfig,
    stack: heapless::Vec<Frame, MAX_CONTAINER_DEPTH>,
}

impl NestingGuard {
    pub const fn new(config: TLVConfig) -> Self {
        Self {
            config,
            stack: heapless::Vec::new(),
        }
    }

    pub const fn config(&self) -> &TLVConfig {
        &self.config
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The kind of the innermost open container, or `None` at top level.
    pub fn innermost(&self) -> Option<TLVContainerType> {
        self.stack.last().map(|frame| frame.kind)
    }

    pub fn check_push(&self) -> Result<(), Error> {
        if self.stack.is_full() {
            warn!(
                "Container nesting exceeds the maximum depth of {}",
                MAX_CONTAINER_DEPTH
            );
            Err(ErrorCode::DepthExceeded)?;
        }

        Ok(())
    }

    pub fn push(&mut self, kind: TLVContainerType) -> Result<ContainerToken, Error> {
        self.check_push()?;

        self.stack
            .push(Frame {
                kind,
                seen: ContextTagSet::default(),
            })
            .map_err(|_| ErrorCode::DepthExceeded)?;

        trace!("Open {} at depth {}", kind, self.stack.len());

        Ok(ContainerToken {
            depth: self.stack.len(),
            kind,
        })
    }

    /// Close the innermost container.
    ///
    /// Fails with `ErrorCode::UnbalancedContainer` if the token does not belong
    /// to the innermost container, or if no container is open.
    pub fn pop(&mut self, token: ContainerToken) -> Result<(), Error> {
        self.check_pop(&token)?;

        self.stack.pop();
        trace!("Close {} at depth {}", token.kind, token.depth);

        Ok(())
    }

    /// Check that `token` belongs to the innermost container without closing it.
    pub fn check_pop(&self, token: &ContainerToken) -> Result<(), Error> {
        match self.stack.last() {
            Some(frame) if frame.kind == token.kind && self.stack.len() == token.depth => Ok(()),
            _ => {
                warn!(
                    "Unbalanced close of {} at depth {} (open: {})",
                    token.kind,
                    token.depth,
                    self.stack.len()
                );

                Err(ErrorCode::UnbalancedContainer.into())
            }
        }
    }

    /// Check that `tag` may appear directly inside the innermost container.
    ///
    /// With `strict_tags`, array members must be anonymous (`ErrorCode::InvalidTag`)
    /// and structure members must not be. With `DuplicateTagPolicy::Reject`, a
    /// context tag already used in the same structure fails with `ErrorCode::DuplicateTag`.
    pub fn check_tag(&self, tag: &TLVTag) -> Result<(), Error> {
        let Some(frame) = self.stack.last() else {
            return Ok(());
        };

        if self.config.strict_tags {
            let legal = match frame.kind {
                TLVContainerType::Array => tag.is_anonymous(),
                TLVContainerType::Struct => !tag.is_anonymous(),
                TLVContainerType::List => true,
            };

            if !legal {
                warn!("Tag {} is not allowed inside {}", tag, frame.kind);
                Err(ErrorCode::InvalidTag)?;
            }
        }

        if self.config.duplicate_tags == DuplicateTagPolicy::Reject
            && frame.kind == TLVContainerType::Struct
        {
            if let Some(ctx) = tag.ctx() {
                if frame.seen.contains(ctx) {
                    warn!("Duplicate context tag {} in structure", ctx);
                    Err(ErrorCode::DuplicateTag)?;
                }
            }
        }

        Ok(())
    }

    /// Record `tag` as used in the innermost container.
    ///
    /// Called once the element carrying the tag has been accepted.
    pub fn mark_tag(&mut self, tag: &TLVTag) {
        if self.config.duplicate_tags != DuplicateTagPolicy::Reject {
            return;
        }

        if let (Some(frame), Some(ctx)) = (self.stack.last_mut(), tag.ctx()) {
            if frame.kind == TLVContainerType::Struct {
                frame.seen.insert(ctx);
            }
        }
    }
}
