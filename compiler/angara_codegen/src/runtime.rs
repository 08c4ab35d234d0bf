//! Names of the C runtime's ABI surface (§6 Runtime ABI, §4.6 "Lowered
//! value model"). The runtime itself is hand-written C outside this crate's
//! scope; this module is the single place that spells out the function and
//! macro names codegen assumes it can call, so a rename only touches one
//! file.

pub const CREATE_NIL: &str = "angara_create_nil";
pub const CREATE_BOOL: &str = "angara_create_bool";
pub const CREATE_I64: &str = "angara_create_i64";
pub const CREATE_F64: &str = "angara_create_f64";
pub const STRING_FROM_C: &str = "angara_string_from_c";
pub const STRING_CONCAT: &str = "angara_string_concat";

pub const AS_I64: &str = "AS_I64";
pub const AS_F64: &str = "AS_F64";
pub const AS_BOOL: &str = "AS_BOOL";
pub const AS_OBJ: &str = "AS_OBJ";

pub const LIST_NEW: &str = "angara_list_new";
pub const LIST_PUSH: &str = "angara_list_push";
pub const LIST_GET: &str = "angara_list_get";
pub const LIST_SET: &str = "angara_list_set";
pub const LIST_LEN: &str = "angara_list_len";

pub const RECORD_NEW: &str = "angara_record_new";
pub const RECORD_GET: &str = "angara_record_get";
pub const RECORD_SET: &str = "angara_record_set";

pub const VALUES_EQUAL: &str = "angara_values_equal";
pub const IS_TYPE: &str = "angara_is_type";
pub const IS_NIL: &str = "angara_is_nil";

pub const RETAIN: &str = "angara_retain";
pub const RELEASE: &str = "angara_release";

pub const CLOSURE_NEW: &str = "angara_closure_new";
pub const CALL_CLOSURE: &str = "angara_call";

pub const PUSH_EXCEPTION_FRAME: &str = "angara_push_exception_frame";
pub const POP_EXCEPTION_FRAME: &str = "angara_pop_exception_frame";
pub const EXCEPTION_JMPBUF: &str = "angara_exception_jmpbuf";
pub const THROW: &str = "angara_throw";
pub const TAKE_PENDING_EXCEPTION: &str = "angara_take_pending_exception";

pub const THREAD_SPAWN: &str = "angara_thread_spawn";
pub const THREAD_JOIN: &str = "angara_thread_join";
pub const MUTEX_LOCK: &str = "angara_mutex_lock";
pub const MUTEX_UNLOCK: &str = "angara_mutex_unlock";

pub const ALLOC_OBJECT: &str = "angara_alloc_object";

pub const RUNTIME_INIT: &str = "angara_runtime_init";
pub const RUNTIME_SHUTDOWN: &str = "angara_runtime_shutdown";

pub const RUNTIME_HEADER: &str = "angara_runtime.h";
