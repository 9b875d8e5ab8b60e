//! Literal constructors for the list types, in the style of `vec!`.

/// Builds a [`List`](crate::generic::list::List) from its elements or from
/// `value; n`.
///
/// ```rust
/// use foam_lists::list;
///
/// let faces = list![3, 1, 4];
/// assert_eq!(faces.as_slice(), &[3, 1, 4]);
/// assert_eq!(faces.capacity(), 3);
///
/// let zeros = list![0u8; 5];
/// assert_eq!(zeros.len(), 5);
/// ```
#[macro_export]
macro_rules! list {
    () => {
        $crate::generic::list::List::new()
    };
    ($value:expr; $n:expr) => {
        $crate::generic::list::List::from(::std::vec![$value; $n])
    };
    ($($item:expr),+ $(,)?) => {
        $crate::generic::list::List::from(::std::vec![$($item),+])
    };
}

/// Builds a [`DynamicList`](crate::generic::dynamic_list::DynamicList) with
/// the default minimum capacity. The capacity equals the element count.
///
/// ```rust
/// use foam_lists::dynamic_list;
///
/// let mut cells = dynamic_list![7, 8];
/// cells.append(9).unwrap();
/// assert_eq!(cells.as_slice(), &[7, 8, 9]);
/// ```
#[macro_export]
macro_rules! dynamic_list {
    () => {{
        let list: $crate::generic::dynamic_list::DynamicList<_> =
            $crate::generic::dynamic_list::DynamicList::new();
        list
    }};
    ($value:expr; $n:expr) => {{
        let list: $crate::generic::dynamic_list::DynamicList<_> =
            $crate::generic::dynamic_list::DynamicList::from(::std::vec![$value; $n]);
        list
    }};
    ($($item:expr),+ $(,)?) => {{
        let list: $crate::generic::dynamic_list::DynamicList<_> =
            $crate::generic::dynamic_list::DynamicList::from(::std::vec![$($item),+]);
        list
    }};
}

/// Builds a [`SmallInlineList`](crate::generic::small_list::SmallInlineList);
/// the inline size is taken from the annotated type.
///
/// ```rust
/// use foam_lists::generic::small_list::SmallInlineList;
/// use foam_lists::small_list;
///
/// let points: SmallInlineList<u32, 4> = small_list![10, 11, 12];
/// assert!(points.is_inline());
/// ```
#[macro_export]
macro_rules! small_list {
    () => {
        $crate::generic::small_list::SmallInlineList::new()
    };
    ($($item:expr),+ $(,)?) => {
        $crate::generic::small_list::SmallInlineList::from(::std::vec![$($item),+])
    };
}

/// Builds a [`PackedBoolList`](crate::generic::packed_bool_list::PackedBoolList)
/// with the listed bits set, sized one past the largest index. Evaluates to
/// a `Result` since the blocks are allocated.
///
/// ```rust
/// use foam_lists::packed_bool_list;
///
/// let boundary = packed_bool_list![1, 4].unwrap();
/// assert_eq!(boundary.len(), 5);
/// assert_eq!(boundary.used().as_slice(), &[1, 4]);
/// ```
#[macro_export]
macro_rules! packed_bool_list {
    () => {
        $crate::Result::Ok($crate::generic::packed_bool_list::PackedBoolList::new())
    };
    ($($index:expr),+ $(,)?) => {
        $crate::generic::packed_bool_list::PackedBoolList::from_indices(&[$($index),+])
    };
}
