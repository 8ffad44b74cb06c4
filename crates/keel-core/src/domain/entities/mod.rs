pub mod project;
pub mod scheme;
pub mod settings;
pub mod target;
pub mod workspace;

pub use project::{Package, Project};
pub use scheme::{
    BuildAction, ExecutionAction, ProfileAction, RunAction, Scheme, TargetReference, TestAction,
};
pub use settings::{Configuration, ConfigurationEntry, SettingValue, Settings, SettingsDictionary};
pub use target::{
    CodeGen, CopyFilesAction, CoreDataModel, Entitlements, FileElement, InfoPlist,
    OnDemandResourcesTags, ResourceFileElement, SdkStatus, SourceFile, Target, TargetDependency,
    TargetKind, TargetScript,
};
pub use workspace::{
    AutogeneratedWorkspaceSchemes, CodeCoverageMode, GenerationOptions, TestingOption, Workspace,
};
