//! Altair types: sync committees, participation flags and light client data.
//!
//! Everything phase 0 defines is inherited; the block body, block, signed
//! block and state are redefined.

use ssz_static_types::{Preset, TypeDescriptor};

use super::phase0::Phase0Types;
use super::{bls_pubkey, bls_signature, bytes32, root, uint64, version, Definition};

/// `floorlog2(FINALIZED_ROOT_INDEX)`
pub const FINALIZED_ROOT_DEPTH: u64 = 6;
/// `floorlog2(NEXT_SYNC_COMMITTEE_INDEX)`
pub const NEXT_SYNC_COMMITTEE_DEPTH: u64 = 5;

fn participation_flags() -> TypeDescriptor {
    TypeDescriptor::uint(8)
}

struct AltairTypes<'a> {
    phase0: Phase0Types<'a>,
}

impl<'a> AltairTypes<'a> {
    fn new(preset: &'a Preset) -> Self {
        Self {
            phase0: Phase0Types::new(preset),
        }
    }

    fn preset(&self) -> &Preset {
        self.phase0.preset
    }

    fn sync_aggregate(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "SyncAggregate",
            [
                (
                    "sync_committee_bits",
                    TypeDescriptor::bitvector(self.preset().sync_committee_size),
                ),
                ("sync_committee_signature", bls_signature()),
            ],
        )
    }

    fn sync_committee(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "SyncCommittee",
            [
                (
                    "pubkeys",
                    TypeDescriptor::vector(bls_pubkey(), self.preset().sync_committee_size),
                ),
                ("aggregate_pubkey", bls_pubkey()),
            ],
        )
    }

    fn sync_committee_message(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "SyncCommitteeMessage",
            [
                ("slot", uint64()),
                ("beacon_block_root", root()),
                ("validator_index", uint64()),
                ("signature", bls_signature()),
            ],
        )
    }

    fn sync_committee_contribution(&self) -> TypeDescriptor {
        let p = self.preset();
        let subcommittee_size = p.sync_committee_size / p.sync_committee_subnet_count.max(1);
        TypeDescriptor::record(
            "SyncCommitteeContribution",
            [
                ("slot", uint64()),
                ("beacon_block_root", root()),
                ("subcommittee_index", uint64()),
                ("aggregation_bits", TypeDescriptor::bitvector(subcommittee_size)),
                ("signature", bls_signature()),
            ],
        )
    }

    fn contribution_and_proof(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "ContributionAndProof",
            [
                ("aggregator_index", uint64()),
                ("contribution", self.sync_committee_contribution()),
                ("selection_proof", bls_signature()),
            ],
        )
    }

    fn signed_contribution_and_proof(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "SignedContributionAndProof",
            [
                ("message", self.contribution_and_proof()),
                ("signature", bls_signature()),
            ],
        )
    }

    fn sync_aggregator_selection_data(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "SyncAggregatorSelectionData",
            [("slot", uint64()), ("subcommittee_index", uint64())],
        )
    }

    fn light_client_snapshot(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "LightClientSnapshot",
            [
                ("header", self.phase0.beacon_block_header()),
                ("current_sync_committee", self.sync_committee()),
                ("next_sync_committee", self.sync_committee()),
            ],
        )
    }

    fn light_client_update(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "LightClientUpdate",
            [
                ("header", self.phase0.beacon_block_header()),
                ("next_sync_committee", self.sync_committee()),
                (
                    "next_sync_committee_branch",
                    TypeDescriptor::vector(bytes32(), NEXT_SYNC_COMMITTEE_DEPTH),
                ),
                ("finality_header", self.phase0.beacon_block_header()),
                (
                    "finality_branch",
                    TypeDescriptor::vector(bytes32(), FINALIZED_ROOT_DEPTH),
                ),
                (
                    "sync_committee_bits",
                    TypeDescriptor::bitvector(self.preset().sync_committee_size),
                ),
                ("sync_committee_signature", bls_signature()),
                ("fork_version", version()),
            ],
        )
    }

    fn beacon_block_body(&self) -> TypeDescriptor {
        let mut fields = self.phase0.block_body_fields();
        fields.push(("sync_aggregate", self.sync_aggregate()));
        TypeDescriptor::record("BeaconBlockBody", fields)
    }

    fn beacon_state(&self) -> TypeDescriptor {
        let limit = self.preset().validator_registry_limit;
        let participation = || TypeDescriptor::list(participation_flags(), limit);
        let mut fields = self.phase0.state_prefix_fields();
        fields.push(("previous_epoch_participation", participation()));
        fields.push(("current_epoch_participation", participation()));
        fields.extend(self.phase0.state_finality_fields());
        fields.extend([
            ("inactivity_scores", TypeDescriptor::list(uint64(), limit)),
            ("current_sync_committee", self.sync_committee()),
            ("next_sync_committee", self.sync_committee()),
        ]);
        TypeDescriptor::record("BeaconState", fields)
    }
}

/// All altair definitions under `preset`.
pub fn definitions(preset: &Preset) -> Vec<Definition> {
    let types = AltairTypes::new(preset);
    let mut defs = types.phase0.common_definitions();
    let body = types.beacon_block_body();
    let block = types.phase0.beacon_block_with(body.clone());
    defs.extend([
        ("ParticipationFlags", participation_flags()),
        ("BeaconBlockBody", body),
        (
            "SignedBeaconBlock",
            types.phase0.signed_beacon_block_with(block.clone()),
        ),
        ("BeaconBlock", block),
        ("BeaconState", types.beacon_state()),
        ("SyncAggregate", types.sync_aggregate()),
        ("SyncCommittee", types.sync_committee()),
        ("SyncCommitteeMessage", types.sync_committee_message()),
        ("SyncCommitteeContribution", types.sync_committee_contribution()),
        ("ContributionAndProof", types.contribution_and_proof()),
        ("SignedContributionAndProof", types.signed_contribution_and_proof()),
        ("SyncAggregatorSelectionData", types.sync_aggregator_selection_data()),
        ("LightClientSnapshot", types.light_client_snapshot()),
        ("LightClientUpdate", types.light_client_update()),
    ]);
    defs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Fork, TypeCatalog};
    use ssz_static_types::{RecordDescriptor, MINIMAL};

    fn field_names(ty: &TypeDescriptor) -> Vec<&str> {
        match ty {
            TypeDescriptor::Record(RecordDescriptor { fields, .. }) => {
                fields.iter().map(|(name, _)| name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_altair_extends_phase0() {
        let catalog =
            TypeCatalog::from_definitions(Fork::Altair, MINIMAL, definitions(&Preset::minimal()))
                .unwrap();
        assert_eq!(catalog.len(), 27 + 9);
        assert!(catalog.get("ParticipationFlags").is_none());
    }

    #[test]
    fn test_state_replaces_pending_attestations() {
        let state = AltairTypes::new(&Preset::minimal()).beacon_state();
        let names = field_names(&state);
        assert!(!names.contains(&"previous_epoch_attestations"));
        assert!(names.contains(&"previous_epoch_participation"));
        assert_eq!(names.last(), Some(&"next_sync_committee"));
    }

    #[test]
    fn test_block_body_ends_with_sync_aggregate() {
        let body = AltairTypes::new(&Preset::mainnet()).beacon_block_body();
        assert_eq!(field_names(&body).last(), Some(&"sync_aggregate"));
    }

    #[test]
    fn test_contribution_bits_per_subnet() {
        let contribution = AltairTypes::new(&Preset::minimal()).sync_committee_contribution();
        // 8 + 32 + 8 + bitvector(32 / 4 = 8 bits -> 1 byte) + 96
        assert_eq!(contribution.fixed_size(), Some(145));
    }
}
