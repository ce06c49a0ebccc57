//! A growable array guarded by a reader/writer lock.
//!
//! See [`SyncArray`].
use std::fmt;
use std::slice;
use std::sync::PoisonError;

use crate::error::IndexOutOfRange;
use crate::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An ordered, growable sequence that can be shared between threads.
///
/// Every operation that changes the array takes an exclusive lock for its
/// full duration, and every operation that only looks at it takes a shared
/// lock, so readers never observe a half-finished change.
///
/// Looking up or removing a position that may be absent is an expected
/// outcome and is reported with [`None`]. Inserting or overwriting at a
/// position outside of `[0, len]` is a programming error: [`insert`] and
/// [`update`] panic, while [`try_insert`] and [`try_update`] return an
/// [`IndexOutOfRange`] error instead.
///
/// The `unsafe_*` methods hand out references into the backing storage that
/// outlive the lock. They exist for callers that need zero-copy access and
/// can guarantee on their own that nothing mutates the array while those
/// references are alive.
///
/// [`insert`]: SyncArray::insert
/// [`update`]: SyncArray::update
/// [`try_insert`]: SyncArray::try_insert
/// [`try_update`]: SyncArray::try_update
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use cowsync::SyncArray;
///
/// let array = Arc::new(SyncArray::new());
///
/// let handles: Vec<_> = (0..4)
///     .map(|i| {
///         let array = array.clone();
///         thread::spawn(move || array.push(i))
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(array.len(), 4);
/// assert!(array.contains(&3));
/// ```
pub struct SyncArray<T> {
    storage: RwLock<Vec<T>>,
}

impl<T> SyncArray<T> {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Creates an array holding the elements of `values`, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SyncArray;
    ///
    /// let array = SyncArray::from_vec(vec![1, 2, 3]);
    /// assert_eq!(array.len(), 3);
    /// ```
    pub fn from_vec(values: Vec<T>) -> Self {
        Self {
            storage: RwLock::new(values),
        }
    }

    /// Returns the number of elements in the array.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Appends `value` to the end of the array.
    pub fn push(&self, value: T) {
        self.write().push(value);
    }

    /// Appends every element of `values` to the end of the array, in order.
    ///
    /// All elements are appended under a single lock, so other threads never
    /// observe only part of them.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SyncArray;
    ///
    /// let array = SyncArray::from_vec(vec![1, 2, 3]);
    /// array.extend([4, 5, 6]);
    /// assert_eq!(array.range_load(0, 6), Some(vec![1, 2, 3, 4, 5, 6]));
    /// ```
    pub fn extend<I: IntoIterator<Item = T>>(&self, values: I) {
        self.write().extend(values);
    }

    /// Inserts `value` at `index`, shifting every element after it one slot
    /// to the right. Inserting at `index == len` appends.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SyncArray;
    ///
    /// let array = SyncArray::from_vec(vec![1, 3]);
    /// array.insert(1, 2);
    /// array.insert(3, 4);
    /// assert_eq!(array.range_load(0, 4), Some(vec![1, 2, 3, 4]));
    /// ```
    #[track_caller]
    pub fn insert(&self, index: usize, value: T) {
        if let Err(err) = self.try_insert(index, value) {
            panic!("{err}");
        }
    }

    /// Inserts `value` at `index` like [`insert`](SyncArray::insert), but
    /// returns an error instead of panicking if `index > len`.
    pub fn try_insert(&self, index: usize, value: T) -> Result<(), IndexOutOfRange> {
        let mut storage = self.write();
        check_position("SyncArray::insert", index, storage.len())?;
        storage.insert(index, value);
        Ok(())
    }

    /// Overwrites the element at `index` with `value`. Updating at
    /// `index == len` appends.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SyncArray;
    ///
    /// let array = SyncArray::from_vec(vec![1, 2]);
    /// array.update(0, 10);
    /// array.update(2, 30);
    /// assert_eq!(array.range_load(0, 3), Some(vec![10, 2, 30]));
    /// ```
    #[track_caller]
    pub fn update(&self, index: usize, value: T) {
        if let Err(err) = self.try_update(index, value) {
            panic!("{err}");
        }
    }

    /// Overwrites the element at `index` like [`update`](SyncArray::update),
    /// but returns an error instead of panicking if `index > len`.
    pub fn try_update(&self, index: usize, value: T) -> Result<(), IndexOutOfRange> {
        let mut storage = self.write();
        check_position("SyncArray::update", index, storage.len())?;
        if index == storage.len() {
            storage.push(value);
        } else {
            storage[index] = value;
        }
        Ok(())
    }

    /// Removes and returns the element at `index`, shifting every element
    /// after it one slot to the left.
    ///
    /// Returns `None`, and leaves the array untouched, if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SyncArray;
    ///
    /// let array = SyncArray::from_vec(vec![1, 2, 3]);
    /// assert_eq!(array.remove(1), Some(2));
    /// assert_eq!(array.remove(5), None);
    /// assert_eq!(array.len(), 2);
    /// ```
    pub fn remove(&self, index: usize) -> Option<T> {
        let mut storage = self.write();
        if index < storage.len() {
            Some(storage.remove(index))
        } else {
            None
        }
    }

    /// Removes and returns the last element, or `None` if the array is empty.
    pub fn pop(&self) -> Option<T> {
        self.write().pop()
    }

    /// Calls `visit` with a reference to the element at `index`, or with
    /// `None` if there is no such element.
    ///
    /// The array stays read-locked while `visit` runs, so `visit` must not
    /// mutate the array.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SyncArray;
    ///
    /// let array = SyncArray::from_vec(vec![String::from("a"), String::from("bc")]);
    /// assert_eq!(array.inspect(1, |s| s.map(String::len)), Some(2));
    /// assert_eq!(array.inspect(2, |s| s.map(String::len)), None);
    /// ```
    pub fn inspect<R>(&self, index: usize, visit: impl FnOnce(Option<&T>) -> R) -> R {
        let storage = self.read();
        visit(storage.get(index))
    }

    /// Calls `visit` with the elements in `[start, end)`, or with `None` unless
    /// `start < end <= len`.
    ///
    /// The array stays read-locked while `visit` runs, so `visit` must not
    /// mutate the array.
    pub fn inspect_range<R>(
        &self,
        start: usize,
        end: usize,
        visit: impl FnOnce(Option<&[T]>) -> R,
    ) -> R {
        let storage = self.read();
        visit(range(&storage, start, end))
    }

    /// Returns a reference to the element at `index`, without copying it and
    /// without holding the lock after returning.
    ///
    /// # Safety
    ///
    /// The caller must ensure that no operation mutates the array for as
    /// long as the returned reference is alive. A concurrent `push`, `insert`,
    /// `remove`, `filter` or `clean` may move or free the element it points to.
    pub unsafe fn unsafe_get(&self, index: usize) -> Option<&T> {
        let storage = self.read();
        let value: *const T = storage.get(index)?;
        // SAFETY: the element lives in the heap buffer of the vector, which
        // the caller promises not to mutate while the reference is alive.
        Some(unsafe { &*value })
    }

    /// Returns the elements in `[start, end)` without copying them and
    /// without holding the lock after returning. Returns `None` unless
    /// `start < end <= len`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that no operation mutates the array for as
    /// long as the returned slice is alive.
    pub unsafe fn unsafe_range(&self, start: usize, end: usize) -> Option<&[T]> {
        let storage = self.read();
        let values = range(&storage, start, end)?;
        let (ptr, len) = (values.as_ptr(), values.len());
        // SAFETY: see `unsafe_get`.
        Some(unsafe { slice::from_raw_parts(ptr, len) })
    }

    /// Returns the elements in `[start, end)` for in-place modification,
    /// without copying them and without holding the lock after returning.
    /// Returns `None` unless `start < end <= len`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that nothing else reads or writes the array
    /// for as long as the returned slice is alive, including through other
    /// `unsafe_*` views.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SyncArray;
    ///
    /// let array = SyncArray::from_vec(vec![10, 20, 30]);
    /// // SAFETY: the array is not shared with any other thread.
    /// if let Some(values) = unsafe { array.unsafe_range_mut(0, 3) } {
    ///     for (i, value) in values.iter_mut().enumerate() {
    ///         *value = i;
    ///     }
    /// }
    /// assert_eq!(array.range_load(0, 3), Some(vec![0, 1, 2]));
    /// ```
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn unsafe_range_mut(&self, start: usize, end: usize) -> Option<&mut [T]> {
        let mut storage = self.write();
        if start < end && end <= storage.len() {
            let values = storage.as_mut_ptr();
            // SAFETY: the range is in bounds, and the caller promises exclusive
            // access for as long as the slice is alive.
            Some(unsafe { slice::from_raw_parts_mut(values.add(start), end - start) })
        } else {
            None
        }
    }

    /// Returns every element of the array without copying them and without
    /// holding the lock after returning.
    ///
    /// # Safety
    ///
    /// The caller must ensure that no operation mutates the array for as
    /// long as the returned slice is alive.
    pub unsafe fn unsafe_as_slice(&self) -> &[T] {
        let storage = self.read();
        // SAFETY: see `unsafe_get`.
        unsafe { slice::from_raw_parts(storage.as_ptr(), storage.len()) }
    }

    /// Returns `true` if any element satisfies `predicate`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SyncArray;
    ///
    /// let array = SyncArray::from_vec(vec![1.5, 2.5]);
    /// assert!(array.contains_by(|x| *x > 2.0));
    /// assert!(!array.contains_by(|x| *x > 3.0));
    /// ```
    pub fn contains_by(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        self.read().iter().any(predicate)
    }

    /// Keeps only the elements that satisfy `predicate`, preserving their
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SyncArray;
    ///
    /// let array = SyncArray::from_vec(vec![0, 1, 2, 3, 4, 666]);
    /// array.filter(|x| *x < 10);
    /// assert_eq!(array.range_load(0, array.len()), Some(vec![0, 1, 2, 3, 4]));
    /// ```
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) {
        self.filter_slice(|values| values.into_iter().filter(|v| predicate(v)).collect());
    }

    /// Replaces the contents of the array with the result of `transform`,
    /// which receives the current contents.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SyncArray;
    ///
    /// let array = SyncArray::from_vec(vec![3, 1, 2]);
    /// array.filter_slice(|mut values| {
    ///     values.sort();
    ///     values
    /// });
    /// assert_eq!(array.range_load(0, 3), Some(vec![1, 2, 3]));
    /// ```
    pub fn filter_slice(&self, transform: impl FnOnce(Vec<T>) -> Vec<T>) {
        let mut storage = self.write();
        let values = std::mem::take(&mut *storage);
        *storage = transform(values);
    }

    /// Calls `visit` with the index and a reference to each element, in order.
    ///
    /// The array stays read-locked while `visit` runs, so `visit` must not
    /// mutate the array; doing so deadlocks.
    pub fn for_each(&self, mut visit: impl FnMut(usize, &T)) {
        for (index, value) in self.read().iter().enumerate() {
            visit(index, value);
        }
    }

    /// Reverses the order of the elements.
    pub fn reverse(&self) {
        self.filter_slice(|values| values.into_iter().rev().collect());
    }

    /// Removes every element and releases the backing storage.
    pub fn clean(&self) {
        *self.write() = Vec::new();
    }

    /// Consumes the array, returning its elements.
    pub fn into_vec(self) -> Vec<T> {
        self.storage
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // A panicking callback poisons the lock but leaves a valid vector behind.
    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.storage.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.storage.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> SyncArray<T> {
    /// Returns a copy of the element at `index`, or `None` if there is no
    /// such element.
    pub fn load(&self, index: usize) -> Option<T> {
        self.read().get(index).cloned()
    }

    /// Returns a copy of the elements in `[start, end)`, or `None` unless
    /// `start < end <= len`. The copy is unaffected by later changes to the
    /// array.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SyncArray;
    ///
    /// let array = SyncArray::from_vec(vec![1, 2, 3]);
    /// let mut copy = array.range_load(0, 2).unwrap();
    /// copy[0] = 666;
    /// assert_eq!(array.range_load(0, 2), Some(vec![1, 2]));
    /// assert_eq!(array.range_load(2, 2), None);
    /// ```
    pub fn range_load(&self, start: usize, end: usize) -> Option<Vec<T>> {
        range(&self.read(), start, end).map(<[T]>::to_vec)
    }
}

impl<T: PartialEq> SyncArray<T> {
    /// Returns `true` if the array holds an element equal to `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.contains_by(|v| v == value)
    }
}

/// Checks that `index` is a valid position to insert at or overwrite.
fn check_position(
    operation: &'static str,
    index: usize,
    len: usize,
) -> Result<(), IndexOutOfRange> {
    if index > len {
        Err(IndexOutOfRange {
            operation,
            index,
            len,
        })
    } else {
        Ok(())
    }
}

fn range<T>(values: &[T], start: usize, end: usize) -> Option<&[T]> {
    if start < end && end <= values.len() {
        Some(&values[start..end])
    } else {
        None
    }
}

impl<T> Default for SyncArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for SyncArray<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_vec(values)
    }
}

impl<T> FromIterator<T> for SyncArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone> Clone for SyncArray<T> {
    fn clone(&self) -> Self {
        Self::from_vec(self.read().clone())
    }
}

impl<T: fmt::Debug> fmt::Debug for SyncArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.read().iter()).finish()
    }
}

#[cfg(all(test, not(feature = "shuttle")))]
mod tests {
    use super::*;

    fn contents<T: Clone>(array: &SyncArray<T>) -> Vec<T> {
        array.range_load(0, array.len()).unwrap_or_default()
    }

    mod new {
        use super::*;

        #[test]
        fn is_empty() {
            let array: SyncArray<u32> = SyncArray::new();
            assert!(array.is_empty());
            assert_eq!(array.len(), 0);
        }

        #[test]
        fn from_vec_keeps_order() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            assert_eq!(array.len(), 3);
            assert_eq!(contents(&array), vec![1, 2, 3]);
        }

        #[test]
        fn from_iterator_keeps_order() {
            let array: SyncArray<u32> = (0..4).collect();
            assert_eq!(contents(&array), vec![0, 1, 2, 3]);
        }
    }

    mod push {
        use super::*;

        #[test]
        fn appends_in_order() {
            let array = SyncArray::new();
            array.push(1);
            array.extend([2, 3]);
            assert_eq!(contents(&array), vec![1, 2, 3]);
        }

        #[test]
        fn extend_with_nothing_is_noop() {
            let array = SyncArray::from_vec(vec![1]);
            array.extend(std::iter::empty());
            assert_eq!(array.len(), 1);
        }
    }

    mod insert {
        use super::*;

        #[test]
        fn at_front_shifts_right() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            array.insert(0, 0);
            assert_eq!(contents(&array), vec![0, 1, 2, 3]);
        }

        #[test]
        fn in_middle_shifts_right() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            array.insert(2, 666);
            assert_eq!(contents(&array), vec![1, 2, 666, 3]);
        }

        #[test]
        fn at_len_appends() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            array.insert(3, 4);
            assert_eq!(contents(&array), vec![1, 2, 3, 4]);
        }

        #[test]
        fn into_empty_array_at_zero() {
            let array = SyncArray::new();
            array.insert(0, 'a');
            assert_eq!(contents(&array), vec!['a']);
        }

        #[test]
        #[should_panic(expected = "SyncArray::insert position [5] over index range [0:3]")]
        fn past_len_panics() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            array.insert(5, 4);
        }

        #[test]
        fn try_insert_past_len_leaves_array_untouched() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            let err = array.try_insert(4, 9).unwrap_err();
            assert_eq!(
                err,
                IndexOutOfRange {
                    operation: "SyncArray::insert",
                    index: 4,
                    len: 3
                }
            );
            assert_eq!(contents(&array), vec![1, 2, 3]);
        }

        #[test]
        fn then_remove_restores_original() {
            let original = vec![1, 2, 3, 4];
            for i in 0..=original.len() {
                let array = SyncArray::from_vec(original.clone());
                array.insert(i, 99);
                assert_eq!(array.remove(i), Some(99));
                assert_eq!(contents(&array), original);
            }
        }
    }

    mod update {
        use super::*;

        #[test]
        fn overwrites_existing_slot() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            array.update(1, 20);
            assert_eq!(contents(&array), vec![1, 20, 3]);
        }

        #[test]
        fn at_len_appends() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            array.update(3, 4);
            assert_eq!(contents(&array), vec![1, 2, 3, 4]);
        }

        #[test]
        #[should_panic(expected = "SyncArray::update position [4] over index range [0:3]")]
        fn past_len_panics() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            array.update(4, 4);
        }

        #[test]
        fn try_update_past_len_returns_error() {
            let array: SyncArray<u8> = SyncArray::new();
            assert!(array.try_update(1, 0).is_err());
            assert!(array.is_empty());
        }
    }

    mod remove {
        use super::*;

        #[test]
        fn first_element() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            assert_eq!(array.remove(0), Some(1));
            assert_eq!(contents(&array), vec![2, 3]);
        }

        #[test]
        fn last_element() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            assert_eq!(array.remove(2), Some(3));
            assert_eq!(contents(&array), vec![1, 2]);
        }

        #[test]
        fn only_element() {
            let array = SyncArray::from_vec(vec![1]);
            assert_eq!(array.remove(0), Some(1));
            assert!(array.is_empty());
        }

        #[test]
        fn out_of_range_is_none_without_side_effects() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            assert_eq!(array.remove(3), None);
            assert_eq!(array.remove(usize::MAX), None);
            assert_eq!(contents(&array), vec![1, 2, 3]);
        }
    }

    mod pop {
        use super::*;

        #[test]
        fn is_lifo() {
            let array = SyncArray::new();
            array.extend([1, 2, 3]);
            assert_eq!(array.pop(), Some(3));
            assert_eq!(array.pop(), Some(2));
            assert_eq!(array.pop(), Some(1));
            assert_eq!(array.pop(), None);
        }
    }

    mod load {
        use super::*;

        #[test]
        fn copies_existing_element() {
            let array = SyncArray::from_vec(vec![String::from("a")]);
            let mut value = array.load(0).unwrap();
            value.push('b');
            assert_eq!(array.load(0).as_deref(), Some("a"));
        }

        #[test]
        fn missing_element_is_none() {
            let array = SyncArray::from_vec(vec![1]);
            assert_eq!(array.load(1), None);
        }

        #[test]
        fn inspect_reports_absence() {
            let array = SyncArray::from_vec(vec![1]);
            assert!(array.inspect(0, |v| v == Some(&1)));
            assert!(array.inspect(1, |v| v.is_none()));
        }
    }

    mod range {
        use super::*;

        #[test]
        fn accepts_full_range() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            assert_eq!(array.range_load(0, 3), Some(vec![1, 2, 3]));
        }

        #[test]
        fn rejects_empty_reversed_and_overlong_ranges() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            assert_eq!(array.range_load(1, 1), None);
            assert_eq!(array.range_load(2, 1), None);
            assert_eq!(array.range_load(0, 4), None);
            assert!(array.inspect_range(0, 4, |r| r.is_none()));
        }

        #[test]
        fn inspect_range_sees_subslice() {
            let array = SyncArray::from_vec(vec![1, 2, 3, 4]);
            let sum = array.inspect_range(1, 3, |r| r.map(|r| r.iter().sum::<i32>()));
            assert_eq!(sum, Some(5));
        }

        #[test]
        fn unsafe_range_is_a_view_not_a_copy() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            // SAFETY: the array is not shared, and the views are dropped
            // before the next safe call.
            unsafe {
                if let Some(values) = array.unsafe_range_mut(1, 3) {
                    values[0] = 20;
                }
                assert_eq!(array.unsafe_range(1, 2), Some(&[20][..]));
                assert_eq!(array.unsafe_get(1), Some(&20));
                assert_eq!(array.unsafe_get(3), None);
                assert_eq!(array.unsafe_as_slice(), &[1, 20, 3]);
            }
        }
    }

    mod contains {
        use super::*;

        #[test]
        fn finds_equal_value() {
            let array = SyncArray::from_vec(vec!["a", "b"]);
            assert!(array.contains(&"b"));
            assert!(!array.contains(&"c"));
        }

        #[test]
        fn predicate_works_without_equality() {
            struct Opaque(u32);
            let array = SyncArray::from_vec(vec![Opaque(1), Opaque(2)]);
            assert!(array.contains_by(|o| o.0 == 2));
            assert!(!array.contains_by(|o| o.0 == 3));
        }
    }

    mod filter {
        use super::*;

        #[test]
        fn keeps_matching_elements_in_order() {
            let array = SyncArray::from_vec(vec![5, 1, 8, 2, 9, 3]);
            array.filter(|x| *x < 5);
            assert_eq!(contents(&array), vec![1, 2, 3]);
        }

        #[test]
        fn can_remove_everything() {
            let array = SyncArray::from_vec(vec![1, 2]);
            array.filter(|_| false);
            assert!(array.is_empty());
        }

        #[test]
        fn filter_slice_replaces_contents() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            array.filter_slice(|values| values.into_iter().map(|x| x * 10).collect());
            assert_eq!(contents(&array), vec![10, 20, 30]);
        }

        #[test]
        fn panicking_predicate_leaves_array_usable() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                array.filter(|_| panic!("predicate failed"));
            }));
            assert!(result.is_err());
            array.push(4);
            assert!(array.contains(&4));
        }
    }

    mod reverse {
        use super::*;

        #[test]
        fn reverses_order() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            array.reverse();
            assert_eq!(contents(&array), vec![3, 2, 1]);
        }

        #[test]
        fn twice_is_identity() {
            let array = SyncArray::from_vec(vec![1, 2, 3, 4]);
            array.reverse();
            array.reverse();
            assert_eq!(contents(&array), vec![1, 2, 3, 4]);
        }
    }

    mod for_each {
        use super::*;

        #[test]
        fn visits_in_order_with_indices() {
            let array = SyncArray::from_vec(vec!['a', 'b', 'c']);
            let mut seen = Vec::new();
            array.for_each(|i, c| seen.push((i, *c)));
            assert_eq!(seen, vec![(0, 'a'), (1, 'b'), (2, 'c')]);
        }
    }

    mod clean {
        use super::*;

        #[test]
        fn empties_array() {
            let array = SyncArray::from_vec(vec![1, 2, 3]);
            array.clean();
            assert!(array.is_empty());
            assert_eq!(array.pop(), None);
            assert!(array.into_vec().capacity() == 0);
        }
    }

    #[test]
    fn clone_is_independent() {
        let array = SyncArray::from_vec(vec![1, 2]);
        let copy = array.clone();
        array.push(3);
        assert_eq!(contents(&copy), vec![1, 2]);
    }

    #[test]
    fn debug_lists_elements() {
        let array = SyncArray::from_vec(vec![1, 2]);
        assert_eq!(format!("{array:?}"), "[1, 2]");
    }
}
