//! # Feature Override Chain
//!
//! Lets independently built feature modules adjust a command's parameter
//! record without the command implementation knowing about them.
//!
//! Each contributor declares, at construction, the set of commands it can
//! populate ([`Capabilities`]). When a command is emitted through
//! [`set_params_and_add_cmd`], the record is reset, handed to the caller (if it
//! declares the command), then to every declaring contributor in chain order,
//! and finally encoded.
//!
//! ```text
//!   get_params(reset) ──▶ caller? ──▶ F0? ──▶ F1? ──▶ .. ──▶ add_cmd
//!                          (skip if the command is not declared)
//! ```
//!
//! Contributors share one record: each sees what earlier ones wrote and the
//! last writer of a field wins. There is no conflict detection and no error
//! channel per contributor; a contributor that needs to flag a problem does so
//! through the record's own fields.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashSet;

use crate::buffer::Target;
use crate::command::{Catalog, Command};
use crate::error::{MhwError, MhwResult};
use crate::itf::CmdItf;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Stable identity of a contributor within a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(pub u32);

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Set of commands a contributor can populate
pub struct Capabilities<K: Catalog> {
    kinds: HashSet<K::Kind>,
}

impl<K: Catalog> Capabilities<K> {
    /// Empty capability set
    pub fn new() -> Self {
        Self {
            kinds: HashSet::new(),
        }
    }

    /// Declare command `C`
    pub fn with<C: Command<Catalog = K>>(mut self) -> Self {
        self.kinds.insert(C::KIND);
        self
    }

    /// Declare a command by kind
    pub fn with_kind(mut self, kind: K::Kind) -> Self {
        self.kinds.insert(kind);
        self
    }

    /// Whether command `C` is declared
    #[inline]
    pub fn contains<C: Command<Catalog = K>>(&self) -> bool {
        self.kinds.contains(&C::KIND)
    }

    /// Whether a command kind is declared
    #[inline]
    pub fn contains_kind(&self, kind: K::Kind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Number of declared commands
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// True if nothing is declared
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl<K: Catalog> Default for Capabilities<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Catalog> fmt::Debug for Capabilities<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds.iter()).finish()
    }
}

// =============================================================================
// CONTRIBUTOR TRAIT
// =============================================================================

/// A pluggable parameter contributor for catalog `K`
pub trait Feature<K: Catalog> {
    /// Stable identity
    fn id(&self) -> FeatureId;

    /// Name for logs
    fn name(&self) -> &'static str;

    /// Commands this contributor populates
    fn capabilities(&self) -> &Capabilities<K>;

    /// Adjust a record.
    ///
    /// Only called with variants whose command is declared in
    /// [`capabilities`](Feature::capabilities).
    fn set_params(&self, params: K::ParamsMut<'_>);
}

// =============================================================================
// CHAIN
// =============================================================================

/// How the caller's own contribution interacts with the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallerPolicy {
    /// Caller first, then every declaring contributor
    #[default]
    Cumulative,
    /// If the caller handled the command, the chain is not walked
    CallerExclusive,
}

/// Ordered collection of contributors for catalog `K`
pub struct FeatureChain<K: Catalog> {
    /// Contributors, in precedence order (later wins)
    features: Vec<Box<dyn Feature<K>>>,
    /// Caller/chain interaction
    policy: CallerPolicy,
}

impl<K: Catalog> FeatureChain<K> {
    /// Empty chain with the cumulative policy
    pub fn new() -> Self {
        Self::with_policy(CallerPolicy::default())
    }

    /// Empty chain with an explicit policy
    pub fn with_policy(policy: CallerPolicy) -> Self {
        Self {
            features: Vec::new(),
            policy,
        }
    }

    /// Caller/chain interaction in effect
    pub fn policy(&self) -> CallerPolicy {
        self.policy
    }

    /// Append a contributor at the end (highest precedence so far)
    pub fn register(&mut self, feature: Box<dyn Feature<K>>) -> MhwResult<()> {
        let id = feature.id();
        if self.contains(id) {
            log::error!("feature {:?} ({}) already registered", id, feature.name());
            return Err(MhwError::DuplicateFeature(id));
        }

        log::debug!(
            "registered feature {:?} ({}) for {} commands",
            id,
            feature.name(),
            feature.capabilities().len()
        );
        self.features.push(feature);
        Ok(())
    }

    /// Whether a contributor with `id` is registered
    pub fn contains(&self, id: FeatureId) -> bool {
        self.features.iter().any(|f| f.id() == id)
    }

    /// Look up a contributor
    pub fn get(&self, id: FeatureId) -> Option<&dyn Feature<K>> {
        self.features.iter().find(|f| f.id() == id).map(|f| &**f)
    }

    /// Number of contributors
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True if empty
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Contributors in precedence order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Feature<K>> {
        self.features.iter().map(|f| &**f)
    }

    /// Run the caller and the chain over `params`.
    ///
    /// Returns how many contributions were applied.
    pub fn apply<C>(&self, caller: Option<&dyn Feature<K>>, params: &mut C::Params) -> usize
    where
        C: Command<Catalog = K>,
    {
        let mut applied = 0;

        if let Some(caller) = caller {
            if caller.capabilities().contains::<C>() {
                log::debug!("{}: caller {} sets params", C::NAME, caller.name());
                caller.set_params(C::tagged(params));
                applied += 1;

                if self.policy == CallerPolicy::CallerExclusive {
                    return applied;
                }
            }
        }

        for feature in self.features.iter() {
            if !feature.capabilities().contains::<C>() {
                continue;
            }
            log::debug!("{}: feature {} sets params", C::NAME, feature.name());
            feature.set_params(C::tagged(params));
            applied += 1;
        }

        applied
    }
}

impl<K: Catalog> Default for FeatureChain<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Catalog> fmt::Debug for FeatureChain<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureChain")
            .field("features", &self.features.iter().map(|f| f.name()).collect::<Vec<_>>())
            .field("policy", &self.policy)
            .finish()
    }
}

// =============================================================================
// COMPOSED EMISSION
// =============================================================================

/// Reset the record of `C`, let the caller and the chain populate it, then
/// emit it.
///
/// The first error from emission aborts the call; contributors themselves
/// cannot fail.
pub fn set_params_and_add_cmd<C, I>(
    itf: &mut I,
    caller: Option<&dyn Feature<C::Catalog>>,
    chain: &FeatureChain<C::Catalog>,
    target: Target<'_>,
    extra: Option<&[u8]>,
) -> MhwResult<()>
where
    C: Command,
    I: CmdItf<C> + ?Sized,
{
    let params = itf.get_params(true);
    chain.apply::<C>(caller, params);
    itf.add_cmd(target, extra)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{CommandBuffer, CommandSink};
    use crate::test_catalog::*;
    use alloc::boxed::Box;

    struct Writer {
        id: FeatureId,
        value: u32,
        caps: Capabilities<TestCatalog>,
    }

    impl Writer {
        fn new(id: u32, value: u32) -> Self {
            Self {
                id: FeatureId(id),
                value,
                caps: Capabilities::new().with::<Cmd1>(),
            }
        }
    }

    impl Feature<TestCatalog> for Writer {
        fn id(&self) -> FeatureId {
            self.id
        }

        fn name(&self) -> &'static str {
            "writer"
        }

        fn capabilities(&self) -> &Capabilities<TestCatalog> {
            &self.caps
        }

        fn set_params(&self, params: TestParamsMut<'_>) {
            if let TestParamsMut::Cmd1(p) = params {
                p.value = self.value;
                p.writes += 1;
            }
        }
    }

    /// Declares only `Cmd2`
    struct Bystander {
        caps: Capabilities<TestCatalog>,
    }

    impl Feature<TestCatalog> for Bystander {
        fn id(&self) -> FeatureId {
            FeatureId(99)
        }

        fn name(&self) -> &'static str {
            "bystander"
        }

        fn capabilities(&self) -> &Capabilities<TestCatalog> {
            &self.caps
        }

        fn set_params(&self, params: TestParamsMut<'_>) {
            if let TestParamsMut::Cmd2(p) = params {
                p.flag = true;
            }
        }
    }

    fn bystander() -> Box<Bystander> {
        Box::new(Bystander {
            caps: Capabilities::new().with::<Cmd2>(),
        })
    }

    #[test]
    fn test_capabilities() {
        let caps = Capabilities::<TestCatalog>::new().with::<Cmd1>();
        assert!(caps.contains::<Cmd1>());
        assert!(!caps.contains::<Cmd2>());
        assert!(caps.contains_kind(TestKind::Cmd1));
        assert_eq!(caps.len(), 1);
    }

    #[test]
    fn test_last_writer_wins() {
        let mut chain = FeatureChain::<TestCatalog>::new();
        chain.register(Box::new(Writer::new(1, 0xA))).unwrap();
        chain.register(Box::new(Writer::new(2, 0xB))).unwrap();

        let mut params = Cmd1Par::default();
        let applied = chain.apply::<Cmd1>(None, &mut params);

        assert_eq!(applied, 2);
        assert_eq!(params.value, 0xB);
        assert_eq!(params.writes, 2);
    }

    #[test]
    fn test_undeclared_contributor_is_skipped() {
        let mut chain = FeatureChain::<TestCatalog>::new();
        chain.register(Box::new(Writer::new(1, 0xA))).unwrap();
        chain.register(bystander()).unwrap();

        let mut params = Cmd1Par::default();
        chain.apply::<Cmd1>(None, &mut params);
        assert_eq!(params.value, 0xA);
        assert_eq!(params.writes, 1);

        let mut params = Cmd2Par::default();
        assert_eq!(chain.apply::<Cmd2>(None, &mut params), 1);
        assert!(params.flag);
    }

    #[test]
    fn test_cumulative_caller_then_chain() {
        let mut chain = FeatureChain::<TestCatalog>::new();
        chain.register(Box::new(Writer::new(1, 0xB))).unwrap();
        let caller = Writer::new(0, 0xC);

        let mut params = Cmd1Par::default();
        let applied = chain.apply::<Cmd1>(Some(&caller), &mut params);

        assert_eq!(applied, 2);
        assert_eq!(params.value, 0xB);
        assert_eq!(params.writes, 2);
    }

    #[test]
    fn test_caller_exclusive_policy() {
        let mut chain = FeatureChain::<TestCatalog>::with_policy(CallerPolicy::CallerExclusive);
        chain.register(Box::new(Writer::new(1, 0xB))).unwrap();
        let caller = Writer::new(0, 0xC);

        let mut params = Cmd1Par::default();
        assert_eq!(chain.apply::<Cmd1>(Some(&caller), &mut params), 1);
        assert_eq!(params.value, 0xC);

        // A caller that does not declare the command does not suppress the chain.
        let idle = Bystander {
            caps: Capabilities::new().with::<Cmd2>(),
        };
        let mut params = Cmd1Par::default();
        assert_eq!(chain.apply::<Cmd1>(Some(&idle), &mut params), 1);
        assert_eq!(params.value, 0xB);
    }

    #[test]
    fn test_duplicate_feature_rejected() {
        let mut chain = FeatureChain::<TestCatalog>::new();
        chain.register(Box::new(Writer::new(7, 1))).unwrap();

        assert_eq!(
            chain.register(Box::new(Writer::new(7, 2))),
            Err(MhwError::DuplicateFeature(FeatureId(7)))
        );
        assert_eq!(chain.len(), 1);
        assert!(chain.get(FeatureId(7)).is_some());
        assert!(chain.get(FeatureId(8)).is_none());
    }

    #[test]
    fn test_set_params_and_add_cmd_resets_first() {
        let mut chain = FeatureChain::<TestCatalog>::new();
        chain.register(Box::new(Writer::new(1, 0x1234_5678))).unwrap();

        let mut imp = TestImpl::new();
        CmdItf::<Cmd1>::get_params(&mut imp, false).writes = 40;

        let mut buf = CommandBuffer::new(64);
        set_params_and_add_cmd::<Cmd1, _>(&mut imp, None, &chain, Target::Cmd(&mut buf), None)
            .unwrap();

        assert_eq!(buf.offset(), 16);
        assert_eq!(CmdItf::<Cmd1>::get_params(&mut imp, false).writes, 1);
        assert_eq!(&buf.as_bytes()[4..8], &0x1234_5678u32.to_le_bytes());
    }

    #[test]
    fn test_set_params_and_add_cmd_propagates_emission_error() {
        let chain = FeatureChain::<TestCatalog>::new();
        let mut imp = TestImpl::new();
        let mut buf = CommandBuffer::new(8);

        let err = set_params_and_add_cmd::<Cmd1, _>(
            &mut imp,
            None,
            &chain,
            Target::Cmd(&mut buf),
            None,
        )
        .unwrap_err();

        assert!(matches!(err, MhwError::Append(_)));
        assert_eq!(buf.offset(), 0);
    }
}
