/// Interface documentation: input/output descriptions and the help text renderer.
use std::fmt::Write;

use serde::Serialize;

use super::outputs::FIRST_LEVEL_OUTPUTS;
use super::request::InterfaceKind;

/// One documented input of an interface.
#[derive(Debug, Clone, Serialize)]
pub struct InputSpec {
    pub name: &'static str,
    /// Value description, e.g. "an existing file name".
    pub kind: &'static str,
    pub mandatory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    pub desc: &'static str,
}

/// One documented output of an interface.
#[derive(Debug, Clone, Serialize)]
pub struct OutputSpec {
    pub name: &'static str,
    pub desc: &'static str,
}

/// Full documentation of an interface.
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceDoc {
    pub interface: InterfaceKind,
    pub tool: &'static str,
    pub summary: &'static str,
    pub inputs: Vec<InputSpec>,
    pub outputs: Vec<OutputSpec>,
}

const fn mandatory(name: &'static str, kind: &'static str, desc: &'static str) -> InputSpec {
    InputSpec {
        name,
        kind,
        mandatory: true,
        default: None,
        desc,
    }
}

const fn optional(
    name: &'static str,
    kind: &'static str,
    default: Option<&'static str>,
    desc: &'static str,
) -> InputSpec {
    InputSpec {
        name,
        kind,
        mandatory: false,
        default,
        desc,
    }
}

const FILE: &str = "an existing file name";
const DIR: &str = "an existing directory name";
const INDEX: &str = "a non-negative integer";
const FLAG: &str = "a boolean";

/// Documentation for `kind`.
#[must_use]
pub fn interface_doc(kind: InterfaceKind) -> InterfaceDoc {
    match kind {
        InterfaceKind::Firstlevel => first_level_doc(),
        InterfaceKind::Ica => ica_doc(),
    }
}

fn first_level_doc() -> InterfaceDoc {
    let descs = [
        "GLM parameter estimates, one volume per regressor",
        "Contrast estimates, one volume per contrast",
        "Statistical maps (t or F), one volume per contrast",
    ];
    InterfaceDoc {
        interface: InterfaceKind::Firstlevel,
        tool: InterfaceKind::Firstlevel.tool_name(),
        summary: "Run a first-level (single subject) GLM analysis, including registration of \
                  the T1 volume to MNI space and of the fMRI data to the T1 volume.",
        inputs: vec![
            mandatory("fmri_file", FILE, "fMRI (BOLD) volumes to analyse"),
            mandatory("t1_file", FILE, "Skull-stripped anatomical T1 volume"),
            mandatory("mni_file", FILE, "MNI template used as registration target"),
            mandatory(
                "filters_parametric",
                FILE,
                "Quadrature filters for parametric (linear) registration",
            ),
            mandatory(
                "filters_nonparametric",
                FILE,
                "Quadrature filters for non-parametric registration",
            ),
            mandatory(
                "glm_path",
                DIR,
                "Directory with the onset files defining the GLM regressors",
            ),
            optional("opencl_platform", INDEX, Some("0"), "OpenCL platform to use"),
            optional(
                "opencl_device",
                INDEX,
                Some("0"),
                "OpenCL device to use on the selected platform",
            ),
            optional(
                "output",
                "a file name",
                None,
                "Base name of the output volumes (default: fMRI file name)",
            ),
            optional("quiet", FLAG, Some("false"), "Don't print anything to the terminal"),
            optional("verbose", FLAG, Some("false"), "Print extra timing information"),
        ],
        outputs: FIRST_LEVEL_OUTPUTS
            .iter()
            .zip(descs)
            .map(|(&(name, _), desc)| OutputSpec { name, desc })
            .collect(),
    }
}

fn ica_doc() -> InterfaceDoc {
    InterfaceDoc {
        interface: InterfaceKind::Ica,
        tool: InterfaceKind::Ica.tool_name(),
        summary: "Run a spatial independent component analysis of one fMRI run, with \
                  optional smoothing and motion correction beforehand.",
        inputs: vec![
            mandatory("input", FILE, "fMRI volumes to decompose"),
            optional("opencl_platform", INDEX, Some("0"), "OpenCL platform to use"),
            optional(
                "opencl_device",
                INDEX,
                Some("0"),
                "OpenCL device to use on the selected platform",
            ),
            optional(
                "smoothing",
                "a float > 0",
                None,
                "Smooth data before ICA, amount in mm FWHM",
            ),
            optional(
                "motion_correction",
                FLAG,
                Some("false"),
                "Apply motion correction before ICA",
            ),
            optional(
                "variance",
                "a float in (0, 100)",
                Some("80"),
                "Proportion of variance (percent) to keep before ICA",
            ),
            optional(
                "mask",
                FILE,
                None,
                "Spatial mask; an automatic mask is used when absent",
            ),
            optional("zscore", FLAG, Some("false"), "Z-score each time series before ICA"),
            optional(
                "output",
                "a file name",
                None,
                "Output file name (default: <input>_ica.nii)",
            ),
            optional("quiet", FLAG, Some("false"), "Don't print anything to the terminal"),
            optional("verbose", FLAG, Some("false"), "Print extra timing information"),
            optional("debug", FLAG, Some("false"), "Enable tool debug output"),
        ],
        outputs: vec![OutputSpec {
            name: "components",
            desc: "Independent component maps, one volume per component",
        }],
    }
}

/// Render documentation as plain help text.
///
/// Layout: summary, then `Inputs::` split into `[Mandatory]` and
/// `[Optional]`, then `Outputs::`.
#[must_use]
pub fn render_help(doc: &InterfaceDoc) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", doc.tool, interface_label(doc.interface));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", doc.summary);
    let _ = writeln!(out);
    let _ = writeln!(out, "Inputs::");

    for (heading, want) in [("[Mandatory]", true), ("[Optional]", false)] {
        let _ = writeln!(out);
        let _ = writeln!(out, "\t{heading}");
        for input in doc.inputs.iter().filter(|i| i.mandatory == want) {
            match input.default {
                Some(d) => {
                    let _ = writeln!(out, "\t{}: ({}, default {d})", input.name, input.kind);
                }
                None => {
                    let _ = writeln!(out, "\t{}: ({})", input.name, input.kind);
                }
            }
            let _ = writeln!(out, "\t\t{}", input.desc);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Outputs::");
    let _ = writeln!(out);
    for output in &doc.outputs {
        let _ = writeln!(out, "\t{}: ({})", output.name, FILE);
        let _ = writeln!(out, "\t\t{}", output.desc);
    }
    out
}

fn interface_label(kind: InterfaceKind) -> &'static str {
    match kind {
        InterfaceKind::Firstlevel => "firstlevel",
        InterfaceKind::Ica => "ica",
    }
}
