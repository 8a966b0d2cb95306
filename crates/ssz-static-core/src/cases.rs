//! Test cases and their lazy enumeration.
//!
//! A [`TestCase`] carries its identity and a [`CaseProducer`]; nothing is
//! generated or encoded until [`TestCase::produce`] runs. The producer owns
//! everything it needs (descriptor, type seed, case index), so cases can be
//! produced in any order, repeatedly, or in parallel with identical results.

use std::path::PathBuf;
use std::sync::Arc;

use ssz_static_types::{GeneratedValue, TypeDescriptor};

use crate::catalog::{Fork, TypeCatalog};
use crate::codec::{Ssz, SszBackend};
use crate::encode::{EncodedCase, Encoder};
use crate::error::GenerationError;
use crate::provider::GenerationSetting;
use crate::random::{RandomizationMode, SeedStream, ValueGenerator};

pub const RUNNER_NAME: &str = "ssz_static";

/// Deferred generation of one case.
#[derive(Debug, Clone)]
pub struct CaseProducer {
    descriptor: Arc<TypeDescriptor>,
    type_stream: SeedStream,
    case_index: u64,
    mode: RandomizationMode,
    chaos: bool,
    generator: ValueGenerator,
}

impl CaseProducer {
    pub fn new(
        descriptor: Arc<TypeDescriptor>,
        type_stream: SeedStream,
        case_index: u64,
        mode: RandomizationMode,
        chaos: bool,
        generator: ValueGenerator,
    ) -> Self {
        Self {
            descriptor,
            type_stream,
            case_index,
            mode,
            chaos,
            generator,
        }
    }

    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Generate the case value from a fresh stream forked off the type stream.
    pub fn generate(&self) -> Result<GeneratedValue, GenerationError> {
        let mut stream = self.type_stream.fork(self.case_index);
        self.generator
            .generate(&mut stream, self.descriptor.clone(), self.mode, self.chaos)
    }

    pub fn produce<B: SszBackend>(
        &self,
        encoder: &Encoder<B>,
    ) -> Result<EncodedCase, GenerationError> {
        encoder.encode(&self.generate()?)
    }
}

/// One named test case.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub fork: Fork,
    pub preset: String,
    pub runner: &'static str,
    /// Type name.
    pub handler: String,
    /// `ssz_{mode}` or `ssz_{mode}_chaos`.
    pub suite: String,
    /// `case_{i}`
    pub case_name: String,
    producer: CaseProducer,
}

impl TestCase {
    /// Generate and encode with the built-in codec.
    pub fn produce(&self) -> Result<EncodedCase, GenerationError> {
        self.producer.produce(&Encoder::new(Ssz))
    }

    pub fn produce_with<B: SszBackend>(
        &self,
        encoder: &Encoder<B>,
    ) -> Result<EncodedCase, GenerationError> {
        self.producer.produce(encoder)
    }

    pub fn producer(&self) -> &CaseProducer {
        &self.producer
    }

    /// `<preset>/<fork>/<runner>/<handler>/<suite>/<case>`
    pub fn relative_dir(&self) -> PathBuf {
        [
            self.preset.as_str(),
            self.fork.name(),
            self.runner,
            self.handler.as_str(),
            self.suite.as_str(),
            self.case_name.as_str(),
        ]
        .iter()
        .collect()
    }

    /// Slash-separated identity, for logs and error messages.
    pub fn id(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}/{}",
            self.preset, self.fork, self.runner, self.handler, self.suite, self.case_name
        )
    }
}

/// Lazy `catalog × cases-per-type` sequence of test cases for one setting.
#[derive(Debug, Clone)]
pub struct CaseEnumerator {
    fork: Fork,
    preset: String,
    entries: Vec<(String, Arc<TypeDescriptor>)>,
    seed: u64,
    mode: RandomizationMode,
    chaos: bool,
    suite: String,
    count: u64,
    generator: ValueGenerator,
    type_index: usize,
    case_index: u64,
}

impl CaseEnumerator {
    pub fn new(catalog: &TypeCatalog, setting: &GenerationSetting, generator: ValueGenerator) -> Self {
        Self {
            fork: catalog.fork(),
            preset: catalog.preset_name().to_string(),
            entries: catalog
                .iter()
                .map(|(name, ty)| (name.to_string(), ty.clone()))
                .collect(),
            seed: setting.seed,
            mode: setting.mode,
            chaos: setting.chaos,
            suite: setting.suite_name(),
            count: setting.case_count(),
            generator,
            type_index: 0,
            case_index: 0,
        }
    }

    /// Cases emitted for each type.
    pub fn cases_per_type(&self) -> u64 {
        self.count
    }

    pub fn type_count(&self) -> usize {
        self.entries.len()
    }

    fn remaining(&self) -> u64 {
        let types_left = self.entries.len().saturating_sub(self.type_index) as u64;
        (types_left * self.count).saturating_sub(self.case_index)
    }
}

impl Iterator for CaseEnumerator {
    type Item = TestCase;

    fn next(&mut self) -> Option<TestCase> {
        while self.case_index >= self.count {
            if self.type_index >= self.entries.len() {
                return None;
            }
            self.type_index += 1;
            self.case_index = 0;
        }
        let (name, descriptor) = self.entries.get(self.type_index)?;
        let case = TestCase {
            fork: self.fork,
            preset: self.preset.clone(),
            runner: RUNNER_NAME,
            handler: name.clone(),
            suite: self.suite.clone(),
            case_name: format!("case_{}", self.case_index),
            producer: CaseProducer::new(
                descriptor.clone(),
                SeedStream::for_type(self.seed, self.type_index),
                self.case_index,
                self.mode,
                self.chaos,
                self.generator,
            ),
        };
        self.case_index += 1;
        Some(case)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining() as usize;
        (remaining, Some(remaining))
    }
}
