//! Resolution tests over inline registry fixtures.

use indoc::indoc;

use shimgen_registry::Registry;

use crate::{Profile, ProfileSpec, ResolveError, resolve};

fn registry(xml: &str) -> Registry {
    Registry::from_reader(xml.as_bytes()).expect("fixture registry must parse")
}

fn spec<'s>(name: &'s str, tags: &'s [&'s str], features: &'s [&'s str]) -> ProfileSpec<'s> {
    ProfileSpec {
        name,
        api_tags: tags,
        features,
        includes: &[],
        prelude: &[],
    }
}

const THREE_COMMANDS: &str = indoc! {r#"
    <registry>
      <commands>
        <command><proto>void <name>eglCmdA</name></proto></command>
        <command><proto>void <name>eglCmdB</name></proto></command>
        <command><proto>void <name>eglCmdC</name></proto></command>
      </commands>
      <feature api="egl" name="EGL_VERSION_1_0">
        <require>
          <command name="eglCmdA"/>
          <command name="eglCmdB"/>
        </require>
      </feature>
      <extensions>
        <extension name="EGL_EXT_extra" supported="egl">
          <require>
            <command name="eglCmdB"/>
            <command name="eglCmdC"/>
          </require>
        </extension>
      </extensions>
    </registry>
"#};

fn names<'a>(profile: &'a Profile<'a>) -> Vec<&'a str> {
    profile.commands.keys().copied().collect()
}

#[test]
fn feature_and_extension_requirements_union() {
    let registry = registry(THREE_COMMANDS);
    let (profile, diagnostics) =
        resolve(&registry, &spec("egl", &["egl"], &["EGL_VERSION_1_0"])).unwrap();

    assert_eq!(names(&profile), ["eglCmdA", "eglCmdB", "eglCmdC"]);
    assert!(diagnostics.is_empty());
}

#[test]
fn require_block_scoped_to_other_api_is_excluded() {
    let registry = registry(indoc! {r#"
        <registry>
          <commands>
            <command><proto>void <name>eglCmdA</name></proto></command>
            <command><proto>void <name>eglCmdC</name></proto></command>
          </commands>
          <feature api="egl" name="EGL_VERSION_1_0">
            <require><command name="eglCmdA"/></require>
          </feature>
          <extensions>
            <extension name="EGL_EXT_extra" supported="egl">
              <require api="wayland">
                <command name="eglCmdC"/>
              </require>
            </extension>
          </extensions>
        </registry>
    "#});
    let (profile, _) = resolve(&registry, &spec("egl", &["egl"], &["EGL_VERSION_1_0"])).unwrap();

    assert_eq!(names(&profile), ["eglCmdA"]);
}

#[test]
fn require_block_scoped_to_own_api_is_included() {
    let registry = registry(indoc! {r#"
        <registry>
          <commands>
            <command><proto>void <name>glCmdA</name></proto></command>
            <command><proto>void <name>glCmdB</name></proto></command>
          </commands>
          <feature api="gles2" name="GL_ES_VERSION_2_0">
            <require><command name="glCmdA"/></require>
          </feature>
          <extensions>
            <extension name="GL_EXT_extra" supported="gles3">
              <require api="gles3">
                <command name="glCmdB"/>
              </require>
            </extension>
          </extensions>
        </registry>
    "#});

    // The GLES2+ profile accepts both tags, so a gles3-only extension with a
    // gles3-scoped block still applies.
    let (profile, _) = resolve(
        &registry,
        &spec("gles2", &["gles2", "gles3"], &["GL_ES_VERSION_2_0"]),
    )
    .unwrap();

    assert_eq!(names(&profile), ["glCmdA", "glCmdB"]);
}

#[test]
fn extension_supported_elsewhere_is_skipped() {
    let registry = registry(indoc! {r#"
        <registry>
          <commands>
            <command><proto>void <name>glCmdA</name></proto></command>
            <command><proto>void <name>glCmdB</name></proto></command>
          </commands>
          <feature api="gles1" name="GL_VERSION_ES_CM_1_0">
            <require><command name="glCmdA"/></require>
          </feature>
          <extensions>
            <extension name="GL_EXT_modern" supported="gles2|glcore">
              <require><command name="glCmdB"/></require>
            </extension>
          </extensions>
        </registry>
    "#});
    let (profile, diagnostics) = resolve(
        &registry,
        &spec("gles1", &["gles1"], &["GL_VERSION_ES_CM_1_0"]),
    )
    .unwrap();

    assert_eq!(names(&profile), ["glCmdA"]);
    assert!(diagnostics.is_empty());
}

#[test]
fn extension_without_supported_tags_is_reported_not_fatal() {
    let registry = registry(indoc! {r#"
        <registry>
          <commands>
            <command><proto>void <name>glCmdA</name></proto></command>
            <command><proto>void <name>glCmdB</name></proto></command>
          </commands>
          <feature api="gles1" name="GL_VERSION_ES_CM_1_0">
            <require><command name="glCmdA"/></require>
          </feature>
          <extensions>
            <extension name="GL_EXT_untagged">
              <require><command name="glCmdB"/></require>
            </extension>
          </extensions>
        </registry>
    "#});
    let (profile, diagnostics) = resolve(
        &registry,
        &spec("gles1", &["gles1"], &["GL_VERSION_ES_CM_1_0"]),
    )
    .unwrap();

    // Treated as inapplicable to every profile, but surfaced by name.
    assert_eq!(names(&profile), ["glCmdA"]);
    assert_eq!(diagnostics.len(), 1);
    let note = diagnostics.iter().next().unwrap();
    assert!(note.contains("GL_EXT_untagged"), "note was: {note}");
}

#[test]
fn unknown_feature_is_fatal() {
    let registry = registry(THREE_COMMANDS);
    let err = resolve(&registry, &spec("egl", &["egl"], &["EGL_VERSION_9_9"])).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::UnknownFeature { ref feature, .. } if feature == "EGL_VERSION_9_9"
    ));
}

#[test]
fn feature_requiring_unknown_command_is_fatal() {
    let registry = registry(indoc! {r#"
        <registry>
          <commands>
            <command><proto>void <name>eglCmdA</name></proto></command>
          </commands>
          <feature api="egl" name="EGL_VERSION_1_0">
            <require><command name="eglMissing"/></require>
          </feature>
        </registry>
    "#});
    let err = resolve(&registry, &spec("egl", &["egl"], &["EGL_VERSION_1_0"])).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::UnknownFeatureCommand { ref command, .. } if command == "eglMissing"
    ));
}

#[test]
fn extension_requiring_unknown_command_is_fatal() {
    let registry = registry(indoc! {r#"
        <registry>
          <commands>
            <command><proto>void <name>eglCmdA</name></proto></command>
          </commands>
          <feature api="egl" name="EGL_VERSION_1_0">
            <require><command name="eglCmdA"/></require>
          </feature>
          <extensions>
            <extension name="EGL_EXT_broken" supported="egl">
              <require><command name="eglMissing"/></require>
            </extension>
          </extensions>
        </registry>
    "#});
    let err = resolve(&registry, &spec("egl", &["egl"], &["EGL_VERSION_1_0"])).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::UnknownExtensionCommand { ref extension, .. } if extension == "EGL_EXT_broken"
    ));
}

#[test]
fn union_profile_is_plain_union_of_parts() {
    let registry = registry(indoc! {r#"
        <registry>
          <commands>
            <command><proto>void <name>eglCmdA</name></proto></command>
            <command><proto>void <name>glCmdB</name></proto></command>
            <command><proto>void <name>glCmdC</name></proto></command>
          </commands>
          <feature api="egl" name="EGL_VERSION_1_0">
            <require><command name="eglCmdA"/></require>
          </feature>
          <feature api="gles2" name="GL_ES_VERSION_2_0">
            <require>
              <command name="glCmdB"/>
              <command name="glCmdC"/>
            </require>
          </feature>
        </registry>
    "#});

    let egl_spec = ProfileSpec {
        name: "egl",
        api_tags: &["egl"],
        features: &["EGL_VERSION_1_0"],
        includes: &["EGL/egl.h"],
        prelude: &[],
    };
    let gles2_spec = ProfileSpec {
        name: "gles2",
        api_tags: &["gles2"],
        features: &["GL_ES_VERSION_2_0"],
        includes: &["GLES2/gl2.h"],
        prelude: &[],
    };
    let (egl, _) = resolve(&registry, &egl_spec).unwrap();
    let (gles2, _) = resolve(&registry, &gles2_spec).unwrap();

    let single = Profile::union("single", &[&egl, &gles2], &[]);
    assert_eq!(names(&single), ["eglCmdA", "glCmdB", "glCmdC"]);
    assert_eq!(single.includes, ["EGL/egl.h", "GLES2/gl2.h"]);

    // Union of the parts exactly; nothing invented, nothing dropped.
    let mut expected: Vec<&str> = names(&egl);
    expected.extend(names(&gles2));
    expected.sort_unstable();
    expected.dedup();
    assert_eq!(names(&single), expected);
}

#[test]
fn duplicate_requirements_collapse() {
    let registry = registry(THREE_COMMANDS);
    let (profile, _) = resolve(&registry, &spec("egl", &["egl"], &["EGL_VERSION_1_0"])).unwrap();

    // eglCmdB arrives from both the feature and the extension; descriptors
    // for the same name are identical so the second insert is a no-op.
    assert_eq!(
        profile.commands.keys().filter(|n| **n == "eglCmdB").count(),
        1
    );
}
