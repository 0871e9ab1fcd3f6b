//! Material definitions and registry

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Phase, SimRng, resolve};

/// Built-in material IDs
pub struct MaterialId;

impl MaterialId {
    /// Empty space
    pub const NONE: u16 = 0;
    pub const SAND: u16 = 1;
    pub const GLASS: u16 = 2;
    pub const WATER: u16 = 3;
    pub const IRON: u16 = 4;
    pub const OXYGEN: u16 = 5;
    pub const HYDROGEN: u16 = 6;
    pub const CARBON_DIOXIDE: u16 = 7;
    pub const METHANE: u16 = 8;

    // Fuels, metals and their oxides
    pub const COAL: u16 = 9;
    pub const IRON_OXIDE: u16 = 10;
    pub const ALUMINUM: u16 = 11;
    pub const ALUMINUM_OXIDE: u16 = 12;
    pub const IRON_THERMITE: u16 = 13;
    pub const MAGNESIUM: u16 = 14;
    pub const MAGNESIUM_OXIDE: u16 = 15;
    pub const SULFUR: u16 = 16;
    pub const SULFUR_TRIOXIDE: u16 = 17;
    pub const BLACK_POWDER: u16 = 18;
    pub const SULFURIC_ACID: u16 = 19;

    // Minerals that decompose when heated
    pub const KAOLINITE: u16 = 20;
    pub const METAKAOLIN: u16 = 21;
    pub const CALCIUM_CARBONATE: u16 = 22;
    pub const CALCIUM_OXIDE: u16 = 23;

    /// Number of built-in materials
    pub const BUILTIN_COUNT: usize = 24;
}

/// Two possible output materials of a transformation.
///
/// With `first_chance == None` the pair is fixed: `first` goes to the reacting
/// cell and `second` to its partner. With `Some(percent)` every output is
/// rolled independently, picking `first` with that percent chance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPair {
    pub first: u16,
    pub second: u16,
    pub first_chance: Option<u8>,
}

impl ProductPair {
    pub const NONE: ProductPair = ProductPair::fixed(MaterialId::NONE, MaterialId::NONE);

    pub const fn fixed(first: u16, second: u16) -> Self {
        Self {
            first,
            second,
            first_chance: None,
        }
    }

    pub const fn random(first: u16, second: u16, first_chance: u8) -> Self {
        Self {
            first,
            second,
            first_chance: Some(first_chance),
        }
    }

    /// Roll a single output
    pub fn pick_one<R: SimRng + ?Sized>(&self, rng: &mut R) -> u16 {
        match self.first_chance {
            None => self.first,
            Some(percent) => {
                if rng.check_percent(percent) {
                    self.first
                } else {
                    self.second
                }
            }
        }
    }

    /// Roll both outputs (reacting cell, partner cell)
    pub fn pick_pair<R: SimRng + ?Sized>(&self, rng: &mut R) -> (u16, u16) {
        match self.first_chance {
            None => (self.first, self.second),
            Some(_) => (self.pick_one(rng), self.pick_one(rng)),
        }
    }
}

/// Definition of a material's physical constants
///
/// Temperatures are in Kelvin, density in g/cm³.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaterialDef {
    pub id: u16,
    pub name: String,
    /// Simplified chemical formula
    pub symbol: String,

    /// Base color (RGBA)
    pub color: [u8; 4],

    /// Density - raw weight used for displacement while solid
    pub density: f32,
    /// Phase the material takes below its melting point
    pub solid_phase: Phase,

    // Thermal properties
    pub melting_point: f32,
    pub boiling_point: f32,
    /// Temperature that must be exceeded before oxidation runs
    pub ignition_point: f32,
    /// Fraction of a temperature difference exchanged per contact per tick
    pub thermal_conductivity: f32,

    // Chemistry
    /// Heat released over a full oxidation (0.0 = inert)
    pub oxidation_threshold: f32,
    /// Oxidation progress gained per reaction (fraction of a full oxidation)
    pub oxidation_speed: f32,
    /// What the material and its oxidizer turn into once fully oxidized
    pub oxidation_products: ProductPair,
    /// What this decomposes into when molten
    pub melt_products: Option<ProductPair>,
    /// Feeds oxidation of neighboring cells
    pub oxidizer: bool,
}

impl MaterialDef {
    /// Whether this material oxidizes at all
    pub fn is_reactive(&self) -> bool {
        self.oxidation_threshold > 0.0
    }
}

impl Default for MaterialDef {
    fn default() -> Self {
        Self {
            id: 0,
            name: "unknown".to_string(),
            symbol: "?".to_string(),
            color: [255, 0, 255, 255], // Magenta for missing materials
            density: 0.0,
            solid_phase: Phase::Static,
            melting_point: 0.0,
            boiling_point: 0.0,
            ignition_point: 0.0,
            thermal_conductivity: 0.0,
            oxidation_threshold: 0.0,
            oxidation_speed: 0.0,
            oxidation_products: ProductPair::NONE,
            melt_products: None,
            oxidizer: false,
        }
    }
}

/// Problems found while building a custom registry
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("registry has no materials")]
    Empty,
    #[error("no material registered for id {0}")]
    Gap(u16),
    #[error("material id {0} registered twice")]
    Duplicate(u16),
    #[error("material 0 must be empty space with zero properties")]
    InvalidNone,
    #[error("material {material} refers to unknown product {product}")]
    UnknownProduct { material: u16, product: u16 },
}

static BUILTIN: Lazy<Arc<Materials>> = Lazy::new(|| Arc::new(Materials::new()));

/// Immutable registry of all materials, indexed by id with no gaps
#[derive(Debug, Clone)]
pub struct Materials {
    materials: Vec<MaterialDef>,
}

impl Materials {
    /// Build the built-in material table
    pub fn new() -> Self {
        let mut builder = MaterialsBuilder::default();
        builder.register_defaults();
        let materials = Self {
            materials: builder.into_sorted(),
        };
        log::debug!("Built material registry with {} materials", materials.len());
        materials
    }

    /// Process-wide shared copy of the built-in table
    pub fn shared() -> Arc<Materials> {
        Arc::clone(&BUILTIN)
    }

    /// Start a custom registry
    pub fn builder() -> MaterialsBuilder {
        MaterialsBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialDef> {
        self.materials.iter()
    }

    /// Get material definition by ID
    ///
    /// Panics when the id is outside the registry.
    #[inline]
    pub fn get(&self, id: u16) -> &MaterialDef {
        match self.materials.get(id as usize) {
            Some(def) => def,
            None => panic!(
                "material id {id} outside registry of {} materials",
                self.materials.len()
            ),
        }
    }

    /// Whether `id` names a registered material
    pub fn contains(&self, id: u16) -> bool {
        (id as usize) < self.materials.len()
    }

    /// Look up a material by name, ignoring case and `_`/` ` differences
    pub fn find_by_name(&self, name: &str) -> Option<u16> {
        let wanted = normalize_name(name);
        self.materials
            .iter()
            .find(|def| normalize_name(&def.name) == wanted)
            .map(|def| def.id)
    }

    pub fn density(&self, id: u16) -> f32 {
        self.get(id).density
    }

    pub fn melting_point(&self, id: u16) -> f32 {
        self.get(id).melting_point
    }

    pub fn boiling_point(&self, id: u16) -> f32 {
        self.get(id).boiling_point
    }

    pub fn ignition_point(&self, id: u16) -> f32 {
        self.get(id).ignition_point
    }

    pub fn thermal_conductivity(&self, id: u16) -> f32 {
        self.get(id).thermal_conductivity
    }

    pub fn oxidation_threshold(&self, id: u16) -> f32 {
        self.get(id).oxidation_threshold
    }

    pub fn oxidation_speed(&self, id: u16) -> f32 {
        self.get(id).oxidation_speed
    }

    pub fn solid_phase(&self, id: u16) -> Phase {
        self.get(id).solid_phase
    }

    pub fn is_oxidizer(&self, id: u16) -> bool {
        self.get(id).oxidizer
    }

    /// Get color for a material
    pub fn color(&self, id: u16) -> [u8; 4] {
        self.get(id).color
    }

    /// Color to display for a material; empty space shows `background`
    pub fn display_color(&self, id: u16, background: [u8; 4]) -> [u8; 4] {
        if id == MaterialId::NONE {
            background
        } else {
            self.color(id)
        }
    }

    /// Outputs of a completed oxidation: (reacting cell, oxidizer cell)
    pub fn oxidation_products<R: SimRng + ?Sized>(&self, id: u16, rng: &mut R) -> (u16, u16) {
        self.get(id).oxidation_products.pick_pair(rng)
    }

    /// Material a molten cell decomposes into, if any
    pub fn melt_product<R: SimRng + ?Sized>(&self, id: u16, rng: &mut R) -> Option<u16> {
        self.get(id)
            .melt_products
            .map(|products| products.pick_one(rng))
    }

    /// Phase of a material at a temperature, without decomposition
    pub fn phase_at(&self, id: u16, temperature: f32) -> Phase {
        resolve(self.get(id), temperature).phase
    }

    /// Materials worth placing on a spawner running at `temperature`.
    ///
    /// Anything that would sit still is left out. Empty space is always
    /// offered, which turns a spawner into a drain.
    pub fn spawnable(&self, temperature: f32) -> impl Iterator<Item = u16> + '_ {
        self.materials
            .iter()
            .filter(move |def| {
                def.id == MaterialId::NONE || self.phase_at(def.id, temperature).is_mobile()
            })
            .map(|def| def.id)
    }
}

impl Default for Materials {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | ' ' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Collects material definitions and validates them into a [`Materials`]
#[derive(Debug, Default, Clone)]
pub struct MaterialsBuilder {
    materials: Vec<MaterialDef>,
}

impl MaterialsBuilder {
    /// Start from the built-in table
    pub fn with_defaults(mut self) -> Self {
        self.register_defaults();
        self
    }

    /// Add or replace a material
    pub fn register(mut self, material: MaterialDef) -> Self {
        self.insert(material);
        self
    }

    /// Change an already registered material in place
    pub fn modify(mut self, id: u16, f: impl FnOnce(&mut MaterialDef)) -> Self {
        if let Some(def) = self.materials.iter_mut().find(|def| def.id == id) {
            f(def);
            def.id = id;
        }
        self
    }

    pub fn build(self) -> Result<Materials, RegistryError> {
        if self.materials.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = vec![false; self.materials.iter().map(|d| d.id as usize + 1).max().unwrap_or(0)];
        for def in &self.materials {
            if std::mem::replace(&mut seen[def.id as usize], true) {
                return Err(RegistryError::Duplicate(def.id));
            }
        }
        if let Some(gap) = seen.iter().position(|present| !present) {
            return Err(RegistryError::Gap(gap as u16));
        }

        let materials = self.into_sorted();
        validate_none(&materials[0])?;

        let count = materials.len();
        for def in &materials {
            let mut products = vec![def.oxidation_products.first, def.oxidation_products.second];
            if let Some(melt) = def.melt_products {
                products.extend([melt.first, melt.second]);
            }
            if let Some(&product) = products.iter().find(|&&p| p as usize >= count) {
                return Err(RegistryError::UnknownProduct {
                    material: def.id,
                    product,
                });
            }
        }

        log::debug!("Built custom material registry with {} materials", count);
        Ok(Materials { materials })
    }

    fn insert(&mut self, material: MaterialDef) {
        self.materials.retain(|def| def.id != material.id);
        self.materials.push(material);
    }

    fn into_sorted(mut self) -> Vec<MaterialDef> {
        self.materials.sort_by_key(|def| def.id);
        self.materials
    }

    fn register_defaults(&mut self) {
        use MaterialId as M;

        // Empty space
        self.insert(MaterialDef {
            id: M::NONE,
            name: "none".to_string(),
            symbol: "nil".to_string(),
            color: [0, 0, 0, 0],
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::SAND,
            name: "sand".to_string(),
            symbol: "Si".to_string(),
            color: [238, 217, 86, 255],
            density: 1.5,
            solid_phase: Phase::Grain,
            melting_point: 1985.15,
            boiling_point: 3223.15,
            thermal_conductivity: 0.00673,
            melt_products: Some(ProductPair::fixed(M::GLASS, M::GLASS)),
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::GLASS,
            name: "glass".to_string(),
            symbol: "Si".to_string(),
            color: [237, 237, 237, 128],
            density: 1.5,
            melting_point: 1985.15,
            boiling_point: 3223.15,
            thermal_conductivity: 0.00673,
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::WATER,
            name: "water".to_string(),
            symbol: "H2O".to_string(),
            color: [150, 150, 255, 205],
            density: 0.999,
            melting_point: 273.15,
            boiling_point: 373.15,
            thermal_conductivity: 0.0061,
            ..Default::default()
        });

        // Rusts slowly at any temperature when touching oxygen
        self.insert(MaterialDef {
            id: M::IRON,
            name: "iron".to_string(),
            symbol: "Fe".to_string(),
            color: [185, 175, 175, 255],
            density: 7.874,
            melting_point: 1811.15,
            boiling_point: 3134.15,
            thermal_conductivity: 0.0804,
            oxidation_threshold: 0.69,
            oxidation_speed: 0.0001112,
            oxidation_products: ProductPair::fixed(M::IRON_OXIDE, M::OXYGEN),
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::OXYGEN,
            name: "oxygen".to_string(),
            symbol: "O2".to_string(),
            color: [200, 200, 255, 100],
            density: 0.001323,
            melting_point: 54.36,
            boiling_point: 90.19,
            thermal_conductivity: 0.002,
            oxidizer: true,
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::HYDROGEN,
            name: "hydrogen".to_string(),
            symbol: "H2".to_string(),
            color: [200, 200, 255, 100],
            density: 0.00008319,
            melting_point: 13.99,
            boiling_point: 27.20,
            ignition_point: 858.0,
            thermal_conductivity: 0.0018,
            oxidation_threshold: 2130.0,
            oxidation_speed: 0.34,
            oxidation_products: ProductPair::fixed(M::WATER, M::WATER),
            ..Default::default()
        });

        // Sublimates: melting point lies above the boiling point
        self.insert(MaterialDef {
            id: M::CARBON_DIOXIDE,
            name: "carbon_dioxide".to_string(),
            symbol: "CO2".to_string(),
            color: [200, 200, 255, 100],
            density: 0.001977,
            melting_point: 216.589,
            boiling_point: 194.686,
            thermal_conductivity: 0.00146,
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::METHANE,
            name: "methane".to_string(),
            symbol: "CH4".to_string(),
            color: [65, 65, 65, 150],
            density: 0.000657,
            melting_point: 90.55,
            boiling_point: 111.65,
            ignition_point: 853.15,
            thermal_conductivity: 0.003,
            oxidation_threshold: 1963.0,
            oxidation_speed: 0.2,
            oxidation_products: ProductPair::fixed(M::WATER, M::CARBON_DIOXIDE),
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::COAL,
            name: "coal".to_string(),
            symbol: "C9O".to_string(),
            color: [30, 30, 30, 255],
            density: 0.833,
            melting_point: 4200.15,
            boiling_point: 3947.65,
            ignition_point: 1001.15,
            thermal_conductivity: 0.0033,
            oxidation_threshold: 5400.0,
            oxidation_speed: 0.005,
            oxidation_products: ProductPair::random(M::WATER, M::CARBON_DIOXIDE, 5),
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::IRON_OXIDE,
            name: "iron_oxide".to_string(),
            symbol: "FeO".to_string(),
            color: [62, 9, 0, 255],
            density: 5.25,
            solid_phase: Phase::Grain,
            melting_point: 1812.0,
            boiling_point: 9999.9,
            thermal_conductivity: 0.063,
            melt_products: Some(ProductPair::fixed(M::IRON, M::IRON)),
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::ALUMINUM,
            name: "aluminum".to_string(),
            symbol: "Al".to_string(),
            color: [200, 200, 210, 255],
            density: 2.699,
            melting_point: 933.47,
            boiling_point: 2743.0,
            thermal_conductivity: 0.237,
            oxidation_threshold: 0.69,
            oxidation_speed: 0.00666666,
            oxidation_products: ProductPair::fixed(M::ALUMINUM_OXIDE, M::OXYGEN),
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::ALUMINUM_OXIDE,
            name: "aluminum_oxide".to_string(),
            symbol: "AlO".to_string(),
            color: [225, 225, 225, 255],
            density: 3.987,
            melting_point: 2345.0,
            boiling_point: 3250.0,
            thermal_conductivity: 0.03,
            melt_products: Some(ProductPair::fixed(M::ALUMINUM, M::ALUMINUM)),
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::IRON_THERMITE,
            name: "iron_thermite".to_string(),
            symbol: "FeAl".to_string(),
            color: [112, 59, 65, 255],
            density: 0.7,
            solid_phase: Phase::Grain,
            melting_point: 1811.15,
            boiling_point: 3134.15,
            ignition_point: 1811.0,
            thermal_conductivity: 0.063,
            oxidation_threshold: 6270.0,
            oxidation_speed: 0.05,
            oxidation_products: ProductPair::random(M::IRON, M::ALUMINUM, 67),
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::MAGNESIUM,
            name: "magnesium".to_string(),
            symbol: "Mg".to_string(),
            color: [200, 200, 200, 255],
            density: 17.37,
            melting_point: 923.0,
            boiling_point: 1363.0,
            ignition_point: 746.0,
            thermal_conductivity: 0.156,
            oxidation_threshold: 6740.0,
            oxidation_speed: 0.1,
            oxidation_products: ProductPair::fixed(M::MAGNESIUM_OXIDE, M::OXYGEN),
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::MAGNESIUM_OXIDE,
            name: "magnesium_oxide".to_string(),
            symbol: "MgO".to_string(),
            color: [240, 240, 240, 255],
            density: 3.6,
            solid_phase: Phase::Grain,
            melting_point: 3125.0,
            boiling_point: 3870.0,
            thermal_conductivity: 0.0525,
            melt_products: Some(ProductPair::fixed(M::MAGNESIUM, M::MAGNESIUM)),
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::SULFUR,
            name: "sulfur".to_string(),
            symbol: "S".to_string(),
            color: [181, 169, 49, 215],
            density: 1.96,
            solid_phase: Phase::Grain,
            melting_point: 388.36,
            boiling_point: 717.8,
            thermal_conductivity: 0.000205,
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::SULFUR_TRIOXIDE,
            name: "sulfur_trioxide".to_string(),
            symbol: "SO3".to_string(),
            color: [240, 240, 240, 255],
            density: 1.92,
            solid_phase: Phase::Grain,
            melting_point: 290.0,
            boiling_point: 318.0,
            thermal_conductivity: 0.011,
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::BLACK_POWDER,
            name: "black_powder".to_string(),
            symbol: "SC".to_string(),
            color: [60, 60, 60, 255],
            density: 1.7,
            solid_phase: Phase::Grain,
            melting_point: 4200.15,
            boiling_point: 3947.65,
            ignition_point: 737.15,
            thermal_conductivity: 0.05,
            oxidation_threshold: 2400.0,
            oxidation_speed: 0.5,
            oxidation_products: ProductPair::fixed(M::SULFUR_TRIOXIDE, M::CARBON_DIOXIDE),
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: M::SULFURIC_ACID,
            name: "sulfuric_acid".to_string(),
            symbol: "H2SO".to_string(),
            color: [255, 255, 255, 30],
            density: 1.8302,
            melting_point: 283.46,
            boiling_point: 610.0,
            thermal_conductivity: 0.0061,
            ..Default::default()
        });

        // Clay
        self.insert(MaterialDef {
            id: M::KAOLINITE,
            name: "kaolinite".to_string(),
            symbol: "cly".to_string(),
            color: [154, 139, 123, 255],
            density: 1.6,
            melting_point: 823.15,
            boiling_point: 9001.69,
            thermal_conductivity: 0.00673,
            melt_products: Some(ProductPair::fixed(M::METAKAOLIN, M::METAKAOLIN)),
            ..Default::default()
        });

        // Ceramic
        self.insert(MaterialDef {
            id: M::METAKAOLIN,
            name: "metakaolin".to_string(),
            symbol: "crm".to_string(),
            color: [212, 191, 169, 255],
            density: 2.6,
            melting_point: 2053.15,
            boiling_point: 9001.69,
            thermal_conductivity: 0.00673,
            melt_products: Some(ProductPair::random(M::GLASS, M::ALUMINUM, 70)),
            ..Default::default()
        });

        // Limestone
        self.insert(MaterialDef {
            id: M::CALCIUM_CARBONATE,
            name: "calcium_carbonate".to_string(),
            symbol: "CaC".to_string(),
            color: [227, 223, 194, 255],
            density: 2.7,
            melting_point: 1098.0,
            boiling_point: 9001.69,
            thermal_conductivity: 0.00126,
            melt_products: Some(ProductPair::random(
                M::CALCIUM_OXIDE,
                M::CARBON_DIOXIDE,
                95,
            )),
            ..Default::default()
        });

        // Cement
        self.insert(MaterialDef {
            id: M::CALCIUM_OXIDE,
            name: "calcium_oxide".to_string(),
            symbol: "CaO".to_string(),
            color: [240, 240, 240, 255],
            density: 3.34,
            solid_phase: Phase::Grain,
            melting_point: 2886.0,
            boiling_point: 3120.0,
            thermal_conductivity: 0.001,
            ..Default::default()
        });
    }
}

fn validate_none(def: &MaterialDef) -> Result<(), RegistryError> {
    let inert = def.id == MaterialId::NONE
        && def.density == 0.0
        && def.thermal_conductivity == 0.0
        && !def.is_reactive()
        && !def.oxidizer
        && def.solid_phase == Phase::Static;
    if inert {
        Ok(())
    } else {
        Err(RegistryError::InvalidNone)
    }
}
