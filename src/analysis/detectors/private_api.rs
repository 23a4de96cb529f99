//! Private API Detector
//!
//! Flags reflective access to non-SDK members, e.g.
//!
//! ```java
//! Method m = AssetManager.class.getDeclaredMethod("addAssetPath", String.class);
//! Class<?> c = Class.forName("com.android.internal.R$styleable");
//! ```
//!
//! How serious the access is depends on the member's restriction and on
//! the app's target SDK: greylisted members become blocked once the app
//! targets a newer platform.

use crate::analysis::{Finding, Issue};
use crate::restriction::{normalize_owner, MemberRef, PrivateApiLookup, Restriction};

/// First API level that enforces hidden API restrictions at all
const BLOCKING_ENFORCED_FROM: u32 = 28;
/// First API level that enforces `GREY_MAX_O` restrictions
const GREY_MAX_O_BLOCKED_FROM: u32 = 28;
/// First API level that enforces `GREY_MAX_P` restrictions
const GREY_MAX_P_BLOCKED_FROM: u32 = 29;

/// Packages whose classes are never part of the public SDK
const INTERNAL_PACKAGES: &[&str] = &["com.android.internal.", "com.android.server.", "dalvik.system.VMRuntime"];

/// Detector for reflective access to hidden platform APIs
#[derive(Debug, Clone)]
pub struct PrivateApiDetector {
    target_sdk: u32,
}

impl PrivateApiDetector {
    pub fn new(target_sdk: u32) -> Self {
        Self { target_sdk }
    }

    pub fn target_sdk(&self) -> u32 {
        self.target_sdk
    }

    /// Looks `member` up and reports according to its restriction
    pub fn check(&self, lookup: &PrivateApiLookup, member: &MemberRef) -> Option<Finding> {
        let restriction = lookup.restriction(&member.owner, &member.name, member.descriptor.as_deref());
        self.check_restriction(member, restriction)
    }

    /// Checks a batch of members, looking them up in parallel
    pub fn check_all(&self, lookup: &PrivateApiLookup, members: &[MemberRef]) -> Vec<Finding> {
        lookup
            .lookup_all(members)
            .into_iter()
            .zip(members)
            .filter_map(|(restriction, member)| self.check_restriction(member, restriction))
            .collect()
    }

    pub fn check_restriction(&self, member: &MemberRef, restriction: Restriction) -> Option<Finding> {
        let name = &member.name;
        let (issue, message) = match restriction {
            Restriction::Black => (
                Issue::BlockedPrivateApi,
                format!(
                    "Reflective access to {} is forbidden when targeting API {} and above",
                    name, BLOCKING_ENFORCED_FROM
                ),
            ),
            Restriction::GreyMaxO if self.target_sdk >= GREY_MAX_O_BLOCKED_FROM => {
                soon_blocked(name, GREY_MAX_O_BLOCKED_FROM)
            }
            Restriction::GreyMaxP if self.target_sdk >= GREY_MAX_P_BLOCKED_FROM => {
                soon_blocked(name, GREY_MAX_P_BLOCKED_FROM)
            }
            Restriction::Grey | Restriction::GreyMaxO | Restriction::GreyMaxP => (
                Issue::DiscouragedPrivateApi,
                format!(
                    "Reflective access to {}, which is not part of the public SDK and therefore likely to change in future Android releases",
                    name
                ),
            ),
            Restriction::White | Restriction::Unknown => return None,
        };
        Some(Finding::new(issue, subject(member)).with_message(message))
    }

    /// Checks a class loaded by name, e.g. through `Class.forName`
    pub fn check_class_name(&self, class_name: &str) -> Option<Finding> {
        let dotted = normalize_owner(class_name).replace('/', ".");
        if !INTERNAL_PACKAGES.iter().any(|prefix| dotted.starts_with(prefix)) {
            return None;
        }
        Some(Finding::new(Issue::PrivateApi, dotted).with_message(
            "Accessing internal APIs via reflection is not supported and may not work on all devices or in the future"
                .to_string(),
        ))
    }
}

fn soon_blocked(name: &str, api: u32) -> (Issue, String) {
    (
        Issue::SoonBlockedPrivateApi,
        format!(
            "Reflective access to {} will throw an exception when targeting API {} and above",
            name, api
        ),
    )
}

fn subject(member: &MemberRef) -> String {
    let owner = normalize_owner(&member.owner).replace('/', ".");
    match &member.descriptor {
        Some(descriptor) => format!("{}#{}{}", owner, member.name, descriptor),
        None => format!("{}#{}", owner, member.name),
    }
}
