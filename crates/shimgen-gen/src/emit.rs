//! C++ module emission.
//!
//! One module per profile, laid out as six passes over the same ordered
//! command list: function-pointer typedefs, cached-pointer slots, warn
//! flags, the cache-reset routine, prototypes, and trampoline bodies.
//! Output is deterministic: commands appear in ascending name order in
//! every pass, so regenerating from an unchanged registry is byte-stable.

use std::collections::BTreeSet;

use shimgen_registry::Command;

use crate::Profile;

/// Name of the emitted routine that forces re-resolution of every symbol.
const RESET_FN: &str = "fakedriverReset";

/// Per-command behavior layered onto the generic trampoline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialCase {
    Plain,
    /// Context (re)initialization: drop every cached binding on entry.
    /// Some platforms silently cache stale symbol bindings across this
    /// boundary.
    ResetOnEntry,
    /// Frame boundary: bump the FPS counter when display is enabled.
    FrameBoundary,
    /// Damage-region swap family: on lookup failure, fall back to the
    /// plain swap entry point.
    DamageFallback,
}

fn special_case(name: &str) -> SpecialCase {
    if name == "eglInitialize" {
        SpecialCase::ResetOnEntry
    } else if name == "eglSwapBuffers" {
        SpecialCase::FrameBoundary
    } else if name.starts_with("eglSwapBuffersWithDamage") {
        SpecialCase::DamageFallback
    } else {
        SpecialCase::Plain
    }
}

/// Render one profile as a complete C++ source module.
///
/// Commands named in `overrides` are excluded from every pass; the caller
/// supplies hand-written implementations for those elsewhere. `provenance`
/// names the generating command in the file's header comment.
pub fn emit_module(profile: &Profile<'_>, overrides: &BTreeSet<&str>, provenance: &str) -> String {
    let commands: Vec<&Command> = profile
        .commands
        .values()
        .copied()
        .filter(|c| !overrides.contains(c.name.as_str()))
        .collect();
    Emitter {
        profile,
        commands,
        out: String::new(),
    }
    .emit(provenance)
}

struct Emitter<'a> {
    profile: &'a Profile<'a>,
    /// Override-filtered commands in ascending name order; every pass
    /// iterates exactly this list.
    commands: Vec<&'a Command>,
    out: String,
}

impl Emitter<'_> {
    fn emit(mut self, provenance: &str) -> String {
        self.header(provenance);
        self.typedefs();
        self.slots();
        self.warn_flags();
        self.reset_routine();
        self.prototypes();
        self.bodies();
        self.out.push_str("} // end of extern C");
        self.out
    }

    fn header(&mut self, provenance: &str) {
        self.out.push_str("// This code is auto-generated by: \n");
        self.out.push_str(&format!("// {}\n", provenance));
        self.out.push_str("#include \"../common.h\"\n\n");
        for include in &self.profile.includes {
            self.out.push_str(&format!("#include \"{}\"\n", include));
        }
        self.out.push_str("\nextern \"C\" {\n\n");
        for line in &self.profile.prelude {
            self.out.push_str(&format!("{}\n", line));
        }
        self.out.push('\n');
    }

    fn typedefs(&mut self) {
        for command in &self.commands {
            self.out.push_str(&format!(
                "typedef {} (*FUNCPTR_{})({});\n",
                command.return_type,
                command.name,
                command.type_list()
            ));
        }
        self.out.push('\n');
    }

    fn slots(&mut self) {
        for command in &self.commands {
            self.out.push_str(&format!(
                "static FUNCPTR_{name} sp_{name} = 0;\n",
                name = command.name
            ));
        }
        self.out.push('\n');
    }

    fn warn_flags(&mut self) {
        for command in &self.commands {
            self.out.push_str(&format!(
                "static bool warned_{} = false;\n",
                command.name
            ));
        }
        self.out.push('\n');
    }

    fn reset_routine(&mut self) {
        self.out.push_str("/// force new function lookups\n");
        self.out.push_str(&format!(
            "__attribute__ ((unused)) static void {}()\n{{\n",
            RESET_FN
        ));
        for command in &self.commands {
            self.out
                .push_str(&format!("    sp_{} = 0;\n", command.name));
            self.out
                .push_str(&format!("    warned_{} = false;\n", command.name));
        }
        self.out.push_str("}\n\n");
    }

    fn prototypes(&mut self) {
        for command in &self.commands {
            self.out.push_str(&format!(
                "PUBLIC {} {}({});\n",
                command.return_type,
                command.name,
                command.param_list()
            ));
        }
        self.out.push('\n');
    }

    fn bodies(&mut self) {
        for i in 0..self.commands.len() {
            let command = self.commands[i];
            self.body(command);
        }
    }

    fn body(&mut self, command: &Command) {
        let name = &command.name;
        let call = format!("tmp({})", command.arg_list());
        let case = special_case(name);

        self.out.push_str(&format!(
            "{} {}({})\n{{\n",
            command.return_type,
            name,
            command.param_list()
        ));
        if case == SpecialCase::ResetOnEntry {
            self.out.push_str(&format!(
                "    {}(); // forcibly break any OS caching of these functions\n",
                RESET_FN
            ));
        }
        // The local copy keeps an in-flight call safe against a concurrent
        // reset clearing the slot between the check and the call.
        self.out.push_str(&format!(
            "    FUNCPTR_{name} tmp = sp_{name};\n",
            name = name
        ));
        self.out.push_str("    if (tmp != 0)\n    {\n");
        if case == SpecialCase::FrameBoundary {
            self.out.push_str("        if (wrapper::CWrapper::sShowFPS)\n");
            self.out.push_str("        {\n");
            self.out
                .push_str("            gFpsLog.SwapBufferHappens();\n");
            self.out.push_str("        }\n");
        }
        self.out.push_str(&format!("        return {};\n    }}\n", call));
        self.out.push_str(&format!(
            "    tmp = (FUNCPTR_{name}) wrapper::CWrapper::GetProcAddress(\"{name}\");\n",
            name = name
        ));
        self.out.push_str("    if (tmp == 0)\n    {\n");
        if case == SpecialCase::DamageFallback {
            self.out.push_str(&format!(
                "        if (!warned_{name}) DBG_LOG(\"Warning: Fakedriver failed to get function pointer for {name}. eglSwapBuffers() will be called instead.\\n\");\n",
                name = name
            ));
            // Some drivers refuse to resolve the damage variant through
            // GetProcAddress yet the loader still routes calls to our
            // exported symbol; without the fallback no swap would happen.
            let leading: Vec<&str> = command
                .params
                .iter()
                .take(2)
                .map(|p| p.name.as_str())
                .collect();
            self.out.push_str(
                "        // Fall back to the plain swap; the damage variant may be unresolvable here.\n",
            );
            self.out
                .push_str(&format!("        eglSwapBuffers({});\n", leading.join(", ")));
        } else {
            self.out.push_str(&format!(
                "        if (!warned_{name}) DBG_LOG(\"Warning: Fakedriver failed to get function pointer for {name}\\n\");\n",
                name = name
            ));
        }
        self.out
            .push_str(&format!("        warned_{} = true;\n", name));
        if command.has_return() {
            self.out.push_str("        return 0;\n");
        } else {
            self.out.push_str("        return;\n");
        }
        self.out.push_str("    }\n");
        self.out
            .push_str(&format!("    sp_{} = tmp;\n", name));
        self.out.push_str(&format!("    return {};\n}}\n\n", call));
    }
}
