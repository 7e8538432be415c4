use std::fs;

use joist_compiler::{Config, SourceMap, compile};
use joist_core::{Declaration, Member, SourceModel, Type};

use super::build::write_artifacts;
use super::check::{check_data, parse_target};
use super::dump::render;

fn sources() -> SourceMap {
    let user = SourceModel::new().import("./role", ["Role"]).declare(
        Declaration::interface(
            "User",
            [],
            [
                Member::required("name", Type::string()),
                Member::required("role", Type::reference("Role")),
            ],
        )
        .public(),
    );
    let role = SourceModel::new().declare(Declaration::enumeration(
        "Role",
        [("Admin", "'admin'"), ("Guest", "'guest'")],
    ));
    SourceMap::new()
        .with_file("src/user.ts", user)
        .with_file("src/role.ts", role)
}

#[test]
fn writes_into_nested_directories() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new().output_directory("gen/schemas");
    let compilation = compile(&sources(), config, &["src/user.ts"]).unwrap();

    let written = write_artifacts(dir.path(), &compilation.artifacts).unwrap();

    assert_eq!(written.len(), 2);
    let user = fs::read_to_string(dir.path().join("gen/schemas/user-schema.ts")).unwrap();
    assert!(user.starts_with("import * as Joi from '@hapi/joi';\n"));
    assert!(user.contains("import { RoleSchema } from './role-schema';"));
    assert!(user.ends_with("}).strict();\n"));
    assert!(dir.path().join("gen/schemas/role-schema.ts").exists());
}

#[test]
fn dump_prefixes_paths() {
    let compilation = compile(&sources(), Config::default(), &["src/user.ts"]).unwrap();

    insta::assert_snapshot!(render(&compilation.artifacts), @r"
    // src/user-schema.ts
    import * as Joi from '@hapi/joi';

    import { RoleSchema } from './role-schema';

    export const UserSchema = Joi.object().keys({
      name: Joi.string().required(),
      role: Joi.lazy(() => RoleSchema).required(),
    }).strict();

    // src/role-schema.ts
    import * as Joi from '@hapi/joi';

    export const RoleSchemaAdmin = Joi.valid('admin');
    export const RoleSchemaGuest = Joi.valid('guest');
    export const RoleSchema = Joi.alternatives(RoleSchemaAdmin, RoleSchemaGuest);
    ");
}

#[test]
fn targets_split_at_last_colon() {
    assert_eq!(parse_target("src/user.ts:User"), Some(("src/user.ts", "User")));
    assert_eq!(parse_target("C:/a.ts:A"), Some(("C:/a.ts", "A")));
    assert_eq!(parse_target("User"), None);
    assert_eq!(parse_target("a.ts:"), None);
}

#[test]
fn checks_data_files() {
    let sources = sources();
    let rules = joist_compiler::ProgramBuilder::new(&sources)
        .ingest(&["src/user.ts"])
        .unwrap()
        .link()
        .unwrap()
        .rules()
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.json");
    let bad = dir.path().join("bad.json");
    fs::write(&good, r#"{ "name": "ada", "role": "admin" }"#).unwrap();
    fs::write(&bad, r#"{ "name": "ada", "role": "root" }"#).unwrap();

    assert_eq!(check_data(&rules, &good, "src/user.ts:User"), Ok(()));
    let err = check_data(&rules, &bad, "src/user.ts:User").unwrap_err();
    assert!(err.ends_with("$.role: no alternative matched"), "{err}");
}
