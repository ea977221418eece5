//! # Matrix Axes Module / 矩阵轴模块
//!
//! This module defines the three independent axes of the validation matrix:
//! the target device, the RTOS and the compiler. Each axis is a closed
//! enumeration; every variant carries an ordered tuple of labels plus the
//! metadata the build and run steps derive from it.
//!
//! 此模块定义验证矩阵的三个独立轴：目标设备、RTOS 和编译器。
//! 每个轴都是一个封闭的枚举；每个变体都带有一组有序标签，
//! 以及构建和运行步骤从中派生的元数据。

use glob::{MatchOptions, Pattern};
use std::fmt;

/// Common behaviour of a matrix axis.
/// 矩阵轴的通用行为。
pub trait Axis: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    /// Axis name as used on the command line (e.g. `device`).
    const NAME: &'static str;
    /// Short command line flag for the axis (e.g. `d`).
    const SHORT: char;

    /// All variants in declaration order.
    fn all() -> &'static [Self];

    /// The variant's identifier (e.g. `CM33_FP`).
    fn name(&self) -> &'static str;

    /// The variant's labels. The first label is the primary one and is used
    /// when the variant is displayed.
    fn labels(&self) -> &'static [&'static str];

    /// Returns `true` if the glob `pattern` matches the variant name or any of its labels.
    /// An invalid pattern matches nothing.
    ///
    /// 如果 glob `pattern` 匹配变体名称或其任意标签，则返回 `true`。
    /// 无效的模式不匹配任何内容。
    fn matches(&self, pattern: &str) -> bool {
        self.matches_with(pattern, MatchOptions::new())
    }

    /// Like [`Axis::matches`] but ignores ASCII case. Used for command line selection.
    fn matches_ignore_case(&self, pattern: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::new()
        };
        self.matches_with(pattern, options)
    }

    #[doc(hidden)]
    fn matches_with(&self, pattern: &str, options: MatchOptions) -> bool {
        match Pattern::new(pattern) {
            Ok(pattern) => std::iter::once(self.name())
                .chain(self.labels().iter().copied())
                .any(|candidate| pattern.matches_with(candidate, options)),
            Err(_) => false,
        }
    }
}

/// Name and extra arguments of the virtual hardware model that runs a device's image.
/// 运行设备镜像的虚拟硬件模型的名称和额外参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelExecutable {
    /// Executable name, resolved through `PATH`.
    pub executable: &'static str,
    /// Model specific arguments inserted before the image argument.
    pub args: &'static [&'static str],
}

/// Target devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Device {
    CM0plus,
    CM3,
    CM4FP,
    CM7DP,
    CM7SP,
    CM23,
    CM33FP,
    CM55,
    CM85,
}

impl Device {
    /// Short device name, the second label (e.g. `CM33_FP`). Used in
    /// context, project and archive names.
    pub fn short_name(&self) -> &'static str {
        self.labels()[1]
    }

    /// Optional alias, the third label (e.g. `SSE300`).
    pub fn alias(&self) -> Option<&'static str> {
        self.labels().get(2).copied()
    }

    /// The virtual hardware model for this device.
    pub fn model(&self) -> ModelExecutable {
        let executable = match self {
            Device::CM0plus => "VHT_MPS2_Cortex-M0plus",
            Device::CM3 => "VHT_MPS2_Cortex-M3",
            Device::CM4FP => "VHT_MPS2_Cortex-M4",
            Device::CM7DP | Device::CM7SP => "VHT_MPS2_Cortex-M7",
            Device::CM23 => "VHT_MPS2_Cortex-M23",
            Device::CM33FP => "VHT_MPS2_Cortex-M33",
            Device::CM55 => "VHT_MPS3_Corstone_SSE-300",
            Device::CM85 => "VHT_Corstone_SSE-310",
        };
        ModelExecutable {
            executable,
            args: &[],
        }
    }
}

impl Axis for Device {
    const NAME: &'static str = "device";
    const SHORT: char = 'd';

    fn all() -> &'static [Self] {
        &[
            Device::CM0plus,
            Device::CM3,
            Device::CM4FP,
            Device::CM7DP,
            Device::CM7SP,
            Device::CM23,
            Device::CM33FP,
            Device::CM55,
            Device::CM85,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            Device::CM0plus => "CM0plus",
            Device::CM3 => "CM3",
            Device::CM4FP => "CM4_FP",
            Device::CM7DP => "CM7_DP",
            Device::CM7SP => "CM7_SP",
            Device::CM23 => "CM23",
            Device::CM33FP => "CM33_FP",
            Device::CM55 => "CM55",
            Device::CM85 => "CM85",
        }
    }

    fn labels(&self) -> &'static [&'static str] {
        match self {
            Device::CM0plus => &["CMSDK_CM0plus_VHT", "CM0plus"],
            Device::CM3 => &["CMSDK_CM3_VHT", "CM3"],
            Device::CM4FP => &["CMSDK_CM4_FP_VHT", "CM4_FP"],
            Device::CM7DP => &["CMSDK_CM7_DP_VHT", "CM7_DP"],
            Device::CM7SP => &["CMSDK_CM7_SP_VHT", "CM7_SP"],
            Device::CM23 => &["IOTKit_CM23_VHT", "CM23"],
            Device::CM33FP => &["IOTKit_CM33_FP_VHT", "CM33_FP"],
            Device::CM55 => &["SSE-300-MPS3", "CM55", "SSE300"],
            Device::CM85 => &["SSE-310-MPS3", "CM85", "SSE310"],
        }
    }
}

/// RTOS implementations under validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rtos {
    Rtx5,
    FreeRtos,
}

impl Axis for Rtos {
    const NAME: &'static str = "rtos";
    const SHORT: char = 'r';

    fn all() -> &'static [Self] {
        &[Rtos::Rtx5, Rtos::FreeRtos]
    }

    fn name(&self) -> &'static str {
        match self {
            Rtos::Rtx5 => "RTX5",
            Rtos::FreeRtos => "FREERTOS",
        }
    }

    fn labels(&self) -> &'static [&'static str] {
        match self {
            Rtos::Rtx5 => &["RTX5"],
            Rtos::FreeRtos => &["FreeRTOS"],
        }
    }
}

/// Supported compilers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Compiler {
    Ac6,
    Gcc,
    Clang,
}

impl Compiler {
    /// File extension of the linked image.
    /// 链接后镜像的文件扩展名。
    pub fn image_ext(&self) -> &'static str {
        match self {
            Compiler::Ac6 => "axf",
            Compiler::Gcc | Compiler::Clang => "elf",
        }
    }

    /// Toolchain name passed to the build tool.
    /// 传递给构建工具的工具链名称。
    pub fn toolchain(&self) -> &'static str {
        match self {
            Compiler::Ac6 => "AC6",
            Compiler::Gcc => "GCC",
            Compiler::Clang => "CLANG",
        }
    }
}

impl Axis for Compiler {
    const NAME: &'static str = "compiler";
    const SHORT: char = 'c';

    fn all() -> &'static [Self] {
        &[Compiler::Ac6, Compiler::Gcc, Compiler::Clang]
    }

    fn name(&self) -> &'static str {
        match self {
            Compiler::Ac6 => "AC6",
            Compiler::Gcc => "GCC",
            Compiler::Clang => "CLANG",
        }
    }

    fn labels(&self) -> &'static [&'static str] {
        match self {
            Compiler::Ac6 => &["AC6"],
            Compiler::Gcc => &["GCC"],
            Compiler::Clang => &["Clang"],
        }
    }
}

macro_rules! display_primary_label {
    ($($axis:ty),*) => {
        $(
            impl fmt::Display for $axis {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.labels()[0])
                }
            }
        )*
    };
}

display_primary_label!(Device, Rtos, Compiler);
