//! Trait shared by the project-scoped and organisation-scoped permission enums.

use std::fmt::Debug;
use std::hash::Hash;

/// A single grantable permission.
///
/// Both [`ProjectPermission`](super::ProjectPermission) and
/// [`OrganisationPermission`](super::OrganisationPermission) implement this,
/// which lets [`PermissionSet`](super::PermissionSet) stay generic while the
/// two scopes remain distinct types that can never be mixed.
///
/// # Example
///
/// ```rust
/// use warden::teams::Permission;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum WikiPermission {
///     EditPages,
///     DeletePages,
/// }
///
/// impl Permission for WikiPermission {
///     fn as_str(&self) -> &'static str {
///         match self {
///             Self::EditPages => "edit_pages",
///             Self::DeletePages => "delete_pages",
///         }
///     }
///
///     fn from_str(s: &str) -> Option<Self> {
///         match s {
///             "edit_pages" => Some(Self::EditPages),
///             "delete_pages" => Some(Self::DeletePages),
///             _ => None,
///         }
///     }
///
///     fn all() -> &'static [Self] {
///         &[Self::EditPages, Self::DeletePages]
///     }
/// }
/// ```
pub trait Permission: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Convert to string for storage.
    fn as_str(&self) -> &'static str;

    /// Parse from a stored string.
    fn from_str(s: &str) -> Option<Self>;

    /// Every variant, in declaration order.
    fn all() -> &'static [Self];
}
