//! Phase 0 beacon-chain types.

use ssz_static_types::{Preset, TypeDescriptor};

use super::{bls_pubkey, bls_signature, bytes32, domain, root, uint64, version, Definition};

/// Phase 0 record constructors bound to a preset.
pub(crate) struct Phase0Types<'a> {
    pub(crate) preset: &'a Preset,
}

impl<'a> Phase0Types<'a> {
    pub(crate) fn new(preset: &'a Preset) -> Self {
        Self { preset }
    }

    pub(crate) fn fork(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "Fork",
            [
                ("previous_version", version()),
                ("current_version", version()),
                ("epoch", uint64()),
            ],
        )
    }

    pub(crate) fn fork_data(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "ForkData",
            [
                ("current_version", version()),
                ("genesis_validators_root", root()),
            ],
        )
    }

    pub(crate) fn checkpoint(&self) -> TypeDescriptor {
        TypeDescriptor::record("Checkpoint", [("epoch", uint64()), ("root", root())])
    }

    pub(crate) fn validator(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "Validator",
            [
                ("pubkey", bls_pubkey()),
                ("withdrawal_credentials", bytes32()),
                ("effective_balance", uint64()),
                ("slashed", TypeDescriptor::boolean()),
                ("activation_eligibility_epoch", uint64()),
                ("activation_epoch", uint64()),
                ("exit_epoch", uint64()),
                ("withdrawable_epoch", uint64()),
            ],
        )
    }

    pub(crate) fn attestation_data(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "AttestationData",
            [
                ("slot", uint64()),
                ("index", uint64()),
                ("beacon_block_root", root()),
                ("source", self.checkpoint()),
                ("target", self.checkpoint()),
            ],
        )
    }

    pub(crate) fn indexed_attestation(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "IndexedAttestation",
            [
                (
                    "attesting_indices",
                    TypeDescriptor::list(uint64(), self.preset.max_validators_per_committee),
                ),
                ("data", self.attestation_data()),
                ("signature", bls_signature()),
            ],
        )
    }

    pub(crate) fn pending_attestation(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "PendingAttestation",
            [
                (
                    "aggregation_bits",
                    TypeDescriptor::bitlist(self.preset.max_validators_per_committee),
                ),
                ("data", self.attestation_data()),
                ("inclusion_delay", uint64()),
                ("proposer_index", uint64()),
            ],
        )
    }

    pub(crate) fn eth1_data(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "Eth1Data",
            [
                ("deposit_root", root()),
                ("deposit_count", uint64()),
                ("block_hash", bytes32()),
            ],
        )
    }

    pub(crate) fn historical_batch(&self) -> TypeDescriptor {
        let roots = || TypeDescriptor::vector(root(), self.preset.slots_per_historical_root);
        TypeDescriptor::record(
            "HistoricalBatch",
            [("block_roots", roots()), ("state_roots", roots())],
        )
    }

    pub(crate) fn deposit_message(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "DepositMessage",
            [
                ("pubkey", bls_pubkey()),
                ("withdrawal_credentials", bytes32()),
                ("amount", uint64()),
            ],
        )
    }

    pub(crate) fn deposit_data(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "DepositData",
            [
                ("pubkey", bls_pubkey()),
                ("withdrawal_credentials", bytes32()),
                ("amount", uint64()),
                ("signature", bls_signature()),
            ],
        )
    }

    pub(crate) fn beacon_block_header(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "BeaconBlockHeader",
            [
                ("slot", uint64()),
                ("proposer_index", uint64()),
                ("parent_root", root()),
                ("state_root", root()),
                ("body_root", root()),
            ],
        )
    }

    pub(crate) fn signing_data(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "SigningData",
            [("object_root", root()), ("domain", domain())],
        )
    }

    pub(crate) fn signed_beacon_block_header(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "SignedBeaconBlockHeader",
            [
                ("message", self.beacon_block_header()),
                ("signature", bls_signature()),
            ],
        )
    }

    pub(crate) fn proposer_slashing(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "ProposerSlashing",
            [
                ("signed_header_1", self.signed_beacon_block_header()),
                ("signed_header_2", self.signed_beacon_block_header()),
            ],
        )
    }

    pub(crate) fn attester_slashing(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "AttesterSlashing",
            [
                ("attestation_1", self.indexed_attestation()),
                ("attestation_2", self.indexed_attestation()),
            ],
        )
    }

    pub(crate) fn attestation(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "Attestation",
            [
                (
                    "aggregation_bits",
                    TypeDescriptor::bitlist(self.preset.max_validators_per_committee),
                ),
                ("data", self.attestation_data()),
                ("signature", bls_signature()),
            ],
        )
    }

    pub(crate) fn deposit(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "Deposit",
            [
                (
                    "proof",
                    TypeDescriptor::vector(
                        bytes32(),
                        self.preset.deposit_contract_tree_depth.saturating_add(1),
                    ),
                ),
                ("data", self.deposit_data()),
            ],
        )
    }

    pub(crate) fn voluntary_exit(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "VoluntaryExit",
            [("epoch", uint64()), ("validator_index", uint64())],
        )
    }

    pub(crate) fn signed_voluntary_exit(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "SignedVoluntaryExit",
            [
                ("message", self.voluntary_exit()),
                ("signature", bls_signature()),
            ],
        )
    }

    /// Fields shared by the phase 0 and altair block bodies.
    pub(crate) fn block_body_fields(&self) -> Vec<(&'static str, TypeDescriptor)> {
        let p = self.preset;
        vec![
            ("randao_reveal", bls_signature()),
            ("eth1_data", self.eth1_data()),
            ("graffiti", bytes32()),
            (
                "proposer_slashings",
                TypeDescriptor::list(self.proposer_slashing(), p.max_proposer_slashings),
            ),
            (
                "attester_slashings",
                TypeDescriptor::list(self.attester_slashing(), p.max_attester_slashings),
            ),
            (
                "attestations",
                TypeDescriptor::list(self.attestation(), p.max_attestations),
            ),
            (
                "deposits",
                TypeDescriptor::list(self.deposit(), p.max_deposits),
            ),
            (
                "voluntary_exits",
                TypeDescriptor::list(self.signed_voluntary_exit(), p.max_voluntary_exits),
            ),
        ]
    }

    pub(crate) fn beacon_block_body(&self) -> TypeDescriptor {
        TypeDescriptor::record("BeaconBlockBody", self.block_body_fields())
    }

    /// `BeaconBlock` wrapping the given body record.
    pub(crate) fn beacon_block_with(&self, body: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::record(
            "BeaconBlock",
            [
                ("slot", uint64()),
                ("proposer_index", uint64()),
                ("parent_root", root()),
                ("state_root", root()),
                ("body", body),
            ],
        )
    }

    pub(crate) fn signed_beacon_block_with(&self, block: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::record(
            "SignedBeaconBlock",
            [("message", block), ("signature", bls_signature())],
        )
    }

    /// Leading `BeaconState` fields, up to and including `slashings`.
    pub(crate) fn state_prefix_fields(&self) -> Vec<(&'static str, TypeDescriptor)> {
        let p = self.preset;
        vec![
            // Versioning
            ("genesis_time", uint64()),
            ("genesis_validators_root", root()),
            ("slot", uint64()),
            ("fork", self.fork()),
            // History
            ("latest_block_header", self.beacon_block_header()),
            (
                "block_roots",
                TypeDescriptor::vector(root(), p.slots_per_historical_root),
            ),
            (
                "state_roots",
                TypeDescriptor::vector(root(), p.slots_per_historical_root),
            ),
            (
                "historical_roots",
                TypeDescriptor::list(root(), p.historical_roots_limit),
            ),
            // Eth1
            ("eth1_data", self.eth1_data()),
            (
                "eth1_data_votes",
                TypeDescriptor::list(
                    self.eth1_data(),
                    p.epochs_per_eth1_voting_period * p.slots_per_epoch,
                ),
            ),
            ("eth1_deposit_index", uint64()),
            // Registry
            (
                "validators",
                TypeDescriptor::list(self.validator(), p.validator_registry_limit),
            ),
            (
                "balances",
                TypeDescriptor::list(uint64(), p.validator_registry_limit),
            ),
            // Randomness
            (
                "randao_mixes",
                TypeDescriptor::vector(bytes32(), p.epochs_per_historical_vector),
            ),
            // Slashings
            (
                "slashings",
                TypeDescriptor::vector(uint64(), p.epochs_per_slashings_vector),
            ),
        ]
    }

    /// Trailing finality fields of `BeaconState`.
    pub(crate) fn state_finality_fields(&self) -> Vec<(&'static str, TypeDescriptor)> {
        vec![
            (
                "justification_bits",
                TypeDescriptor::bitvector(self.preset.justification_bits_length),
            ),
            ("previous_justified_checkpoint", self.checkpoint()),
            ("current_justified_checkpoint", self.checkpoint()),
            ("finalized_checkpoint", self.checkpoint()),
        ]
    }

    pub(crate) fn beacon_state(&self) -> TypeDescriptor {
        let p = self.preset;
        let attestations = || {
            TypeDescriptor::list(
                self.pending_attestation(),
                p.max_attestations * p.slots_per_epoch,
            )
        };
        let mut fields = self.state_prefix_fields();
        fields.push(("previous_epoch_attestations", attestations()));
        fields.push(("current_epoch_attestations", attestations()));
        fields.extend(self.state_finality_fields());
        TypeDescriptor::record("BeaconState", fields)
    }

    // ---- Validator guide ----

    pub(crate) fn eth1_block(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "Eth1Block",
            [
                ("timestamp", uint64()),
                ("deposit_root", root()),
                ("deposit_count", uint64()),
            ],
        )
    }

    pub(crate) fn aggregate_and_proof(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "AggregateAndProof",
            [
                ("aggregator_index", uint64()),
                ("aggregate", self.attestation()),
                ("selection_proof", bls_signature()),
            ],
        )
    }

    pub(crate) fn signed_aggregate_and_proof(&self) -> TypeDescriptor {
        TypeDescriptor::record(
            "SignedAggregateAndProof",
            [
                ("message", self.aggregate_and_proof()),
                ("signature", bls_signature()),
            ],
        )
    }

    /// Definitions every fork from phase 0 on inherits unchanged.
    pub(crate) fn common_definitions(&self) -> Vec<Definition> {
        vec![
            // Aliases
            ("Slot", uint64()),
            ("Epoch", uint64()),
            ("CommitteeIndex", uint64()),
            ("ValidatorIndex", uint64()),
            ("Gwei", uint64()),
            ("Root", root()),
            ("Version", version()),
            ("DomainType", TypeDescriptor::bytes(4)),
            ("ForkDigest", TypeDescriptor::bytes(4)),
            ("Domain", domain()),
            ("BLSPubkey", bls_pubkey()),
            ("BLSSignature", bls_signature()),
            // Records
            ("Fork", self.fork()),
            ("ForkData", self.fork_data()),
            ("Checkpoint", self.checkpoint()),
            ("Validator", self.validator()),
            ("AttestationData", self.attestation_data()),
            ("IndexedAttestation", self.indexed_attestation()),
            ("PendingAttestation", self.pending_attestation()),
            ("Eth1Data", self.eth1_data()),
            ("HistoricalBatch", self.historical_batch()),
            ("DepositMessage", self.deposit_message()),
            ("DepositData", self.deposit_data()),
            ("BeaconBlockHeader", self.beacon_block_header()),
            ("SigningData", self.signing_data()),
            ("SignedBeaconBlockHeader", self.signed_beacon_block_header()),
            ("ProposerSlashing", self.proposer_slashing()),
            ("AttesterSlashing", self.attester_slashing()),
            ("Attestation", self.attestation()),
            ("Deposit", self.deposit()),
            ("VoluntaryExit", self.voluntary_exit()),
            ("SignedVoluntaryExit", self.signed_voluntary_exit()),
            ("Eth1Block", self.eth1_block()),
            ("AggregateAndProof", self.aggregate_and_proof()),
            ("SignedAggregateAndProof", self.signed_aggregate_and_proof()),
        ]
    }
}

/// All phase 0 definitions under `preset`.
pub fn definitions(preset: &Preset) -> Vec<Definition> {
    let types = Phase0Types::new(preset);
    let mut defs = types.common_definitions();
    let body = types.beacon_block_body();
    let block = types.beacon_block_with(body.clone());
    defs.extend([
        ("BeaconBlockBody", body),
        ("SignedBeaconBlock", types.signed_beacon_block_with(block.clone())),
        ("BeaconBlock", block),
        ("BeaconState", types.beacon_state()),
    ]);
    defs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Fork, TypeCatalog};

    #[test]
    fn test_phase0_record_count() {
        let catalog = TypeCatalog::from_definitions(
            Fork::Phase0,
            "minimal",
            definitions(&Preset::minimal()),
        )
        .unwrap();
        assert_eq!(catalog.len(), 27);
        assert!(catalog.get("Slot").is_none());
        assert!(catalog.get("SignedAggregateAndProof").is_some());
    }

    #[test]
    fn test_fixed_sizes() {
        let preset = Preset::minimal();
        let types = Phase0Types::new(&preset);
        assert_eq!(types.checkpoint().fixed_size(), Some(40));
        assert_eq!(types.validator().fixed_size(), Some(121));
        assert_eq!(types.attestation_data().fixed_size(), Some(128));
        assert_eq!(types.deposit().fixed_size(), Some(33 * 32 + 184));
        assert!(!types.beacon_state().is_fixed_size());
    }

    #[test]
    fn test_preset_shapes_historical_batch() {
        let minimal = Phase0Types::new(&Preset::minimal()).historical_batch();
        assert_eq!(minimal.fixed_size(), Some(2 * 64 * 32));
    }
}
