//! Fixed output-profile definitions and the manual-override set.

use shimgen_gen::ProfileSpec;

/// Commands implemented by hand in the wrapper library. No trampoline is
/// ever generated for these, in any profile, the combined one included.
pub const MANUAL_IMPL_FUNCS: &[&str] = &[
    "eglGetProcAddress",
    "eglStreamConsumerGLTextureExternalAttribsNV",
];

/// The GLES1 headers predate these types, so the module declares them.
const GLES1_PRELUDE: &[&str] = &[
    "typedef struct __GLsync *GLsync;",
    "typedef uint64_t GLuint64;",
    "typedef int64_t GLint64;",
];

/// Aliases the GLES2+ extension headers expect.
const GLES2_PRELUDE: &[&str] = &[
    "typedef GLDEBUGPROCKHR GLDEBUGPROC;",
    "typedef void (*GLVULKANPROCNV)(void);",
];

pub const EGL: ProfileSpec<'static> = ProfileSpec {
    name: "egl",
    api_tags: &["egl"],
    features: &[
        "EGL_VERSION_1_0",
        "EGL_VERSION_1_1",
        "EGL_VERSION_1_2",
        "EGL_VERSION_1_3",
        "EGL_VERSION_1_4",
        "EGL_VERSION_1_5",
    ],
    includes: &["EGL/egl.h", "EGL/eglext.h", "fps_log.hpp"],
    prelude: &[],
};

/// GLES2 and newer share one module.
pub const GLES2: ProfileSpec<'static> = ProfileSpec {
    name: "gles2",
    api_tags: &["gles2", "gles3"],
    features: &[
        "GL_ES_VERSION_2_0",
        "GL_ES_VERSION_3_0",
        "GL_ES_VERSION_3_1",
        "GL_ES_VERSION_3_2",
    ],
    includes: &[
        "GLES2/gl2.h",
        "GLES2/gl2ext.h",
        "GLES3/gl3.h",
        "GLES3/gl31.h",
        "GLES3/gl32.h",
    ],
    prelude: GLES2_PRELUDE,
};

/// GLES1 comes after GLES2+ everywhere: glext.h carries a subset of
/// KHR_debug behind the same include guards as gl2ext.h.
pub const GLES1: ProfileSpec<'static> = ProfileSpec {
    name: "gles1",
    api_tags: &["gles1"],
    features: &["GL_VERSION_ES_CM_1_0"],
    includes: &["GLES/gl.h", "GLES/glext.h"],
    prelude: GLES1_PRELUDE,
};

/// The single-library union of every profile; it keeps the GLES2-style
/// prelude since it includes the GLES2+ headers.
pub const SINGLE_NAME: &str = "single";
pub const SINGLE_PRELUDE: &[&str] = GLES2_PRELUDE;
