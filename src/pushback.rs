// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Iterator adaptor allowing to push items back in front of the iterator.

/// Iterator that can be asked whether it has a next item, and to which
/// consumed items can be pushed back. Pushed back items are returned again in
/// last-in first-out order, before resuming the wrapped iterator.
pub struct Pushback<I: Iterator> {
    inner: I,
    pushed: Vec<I::Item>,
}

impl<I: Iterator> Pushback<I> {
    /// Wraps the given iterator.
    pub fn new(inner: impl IntoIterator<IntoIter = I>) -> Self {
        Pushback {
            inner: inner.into_iter(),
            pushed: Vec::new(),
        }
    }

    /// Whether a call to [`Iterator::next()`] would return an item. This
    /// may consume an item of the wrapped iterator and keep it aside.
    pub fn has_next(&mut self) -> bool {
        self.peek().is_some()
    }

    /// Returns a reference to the next item, without consuming it.
    pub fn peek(&mut self) -> Option<&I::Item> {
        if self.pushed.is_empty() {
            let item = self.inner.next()?;
            self.pushed.push(item);
        }
        self.pushed.last()
    }

    /// Pushes an item back, so that it is returned by the next call to
    /// [`Iterator::next()`].
    pub fn push_back(&mut self, item: I::Item) {
        self.pushed.push(item);
    }
}

impl<I: Iterator> Iterator for Pushback<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.pushed.pop().or_else(|| self.inner.next())
    }
}
