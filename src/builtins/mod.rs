//! The builtin catalog: ~180 native operations grouped by category, plus the
//! central [`dispatch`] that `eval.rs`'s `Call` handling consults before
//! falling back to a user-defined function.
//!
//! Builtins are plain `fn(&[Value]) -> Result<Value, AislError>` rather than
//! values registered into an `Environment` — `Value` has no variant for a
//! native function pointer, so there is nothing to `env.define` them as.
//! `dispatch` returns `None` for a name it doesn't recognize, letting the
//! caller fall through to a user-function lookup; it returns `Some(Err(_))`
//! for a recognized name called with the wrong arity or argument types.

use crate::error::AislError;
use crate::value::Value;

pub mod arithmetic;
pub mod arrays;
pub mod comparison;
pub mod conversions;
pub mod files;
pub mod io;
pub mod json_builtins;
pub mod maps;
pub mod process_env;
pub mod processes;
pub mod reflection;
pub mod regex_builtins;
pub mod sockets;
pub mod strings;
pub mod time;
pub mod websocket_builtins;

fn need(args: &[Value], min: usize, name: &str) -> Result<(), AislError> {
    if args.len() < min {
        return Err(AislError::invalid_arguments(
            name,
            format!("expected at least {min} argument(s), got {}", args.len()),
        ));
    }
    Ok(())
}

/// Looks up `name` in the builtin catalog and, if found, runs it against
/// `args`. Returns `None` for unrecognized names.
pub fn dispatch(name: &str, args: &[Value]) -> Option<Result<Value, AislError>> {
    use arithmetic as ar;
    use comparison as cmp;
    use conversions as conv;

    let result = match name {
        // arithmetic
        "add" => need(args, 2, name).and_then(|_| ar::add(args)),
        "sub" => need(args, 2, name).and_then(|_| ar::sub(args)),
        "mul" => need(args, 2, name).and_then(|_| ar::mul(args)),
        "div" => need(args, 2, name).and_then(|_| ar::div(args)),
        "mod" => need(args, 2, name).and_then(|_| ar::modulo(args)),
        "neg" => need(args, 1, name).and_then(|_| ar::neg(args)),
        "abs" => need(args, 1, name).and_then(|_| ar::abs(args)),
        "min" => need(args, 2, name).and_then(|_| ar::min(args)),
        "max" => need(args, 2, name).and_then(|_| ar::max(args)),
        "sqrt" => need(args, 1, name).and_then(|_| ar::sqrt(args)),
        "pow" => need(args, 2, name).and_then(|_| ar::pow(args)),
        "floor" => need(args, 1, name).and_then(|_| ar::floor(args)),
        "ceil" => need(args, 1, name).and_then(|_| ar::ceil(args)),
        "round" => need(args, 1, name).and_then(|_| ar::round(args)),
        "bit_and" => need(args, 2, name).and_then(|_| ar::bit_and(args)),
        "bit_or" => need(args, 2, name).and_then(|_| ar::bit_or(args)),
        "bit_xor" => need(args, 2, name).and_then(|_| ar::bit_xor(args)),
        "bit_not" => need(args, 1, name).and_then(|_| ar::bit_not(args)),
        "bit_shift_left" => need(args, 2, name).and_then(|_| ar::bit_shift_left(args)),
        "bit_shift_right" => need(args, 2, name).and_then(|_| ar::bit_shift_right(args)),

        // comparison
        "eq" => need(args, 2, name).and_then(|_| cmp::eq(args)),
        "ne" => need(args, 2, name).and_then(|_| cmp::ne(args)),
        "lt" => need(args, 2, name).and_then(|_| cmp::lt(args)),
        "gt" => need(args, 2, name).and_then(|_| cmp::gt(args)),
        "le" => need(args, 2, name).and_then(|_| cmp::le(args)),
        "ge" => need(args, 2, name).and_then(|_| cmp::ge(args)),
        "not" => need(args, 1, name).and_then(|_| cmp::not(args)),

        // conversions
        "cast_int_float" => need(args, 1, name).and_then(|_| conv::cast_int_float(args)),
        "cast_float_int" => need(args, 1, name).and_then(|_| conv::cast_float_int(args)),
        "cast_int_decimal" => need(args, 1, name).and_then(|_| conv::cast_int_decimal(args)),
        "cast_decimal_int" => need(args, 1, name).and_then(|_| conv::cast_decimal_int(args)),
        "cast_float_decimal" => need(args, 1, name).and_then(|_| conv::cast_float_decimal(args)),
        "cast_decimal_float" => need(args, 1, name).and_then(|_| conv::cast_decimal_float(args)),
        "string_from_int" => need(args, 1, name).and_then(|_| conv::string_from_int(args)),
        "string_from_float" => need(args, 1, name).and_then(|_| conv::string_from_float(args)),
        "string_from_bool" => need(args, 1, name).and_then(|_| conv::string_from_bool(args)),
        "string_to_int" => need(args, 1, name).and_then(|_| conv::string_to_int(args)),
        "string_to_float" => need(args, 1, name).and_then(|_| conv::string_to_float(args)),
        "char_from_code" => need(args, 1, name).and_then(|_| conv::char_from_code(args)),

        // strings
        "string_length" => need(args, 1, name).and_then(|_| strings::string_length(args)),
        "string_concat" => need(args, 2, name).and_then(|_| strings::string_concat(args)),
        "string_equals" => need(args, 2, name).and_then(|_| strings::string_equals(args)),
        "string_slice" => need(args, 3, name).and_then(|_| strings::string_slice(args)),
        "string_get" => need(args, 2, name).and_then(|_| strings::string_get(args)),
        "string_format" => need(args, 1, name).and_then(|_| strings::string_format(args)),
        "string_find" => need(args, 2, name).and_then(|_| strings::string_find(args)),
        "string_to_upper" => need(args, 1, name).and_then(|_| strings::string_to_upper(args)),
        "string_to_lower" => need(args, 1, name).and_then(|_| strings::string_to_lower(args)),
        "string_split" => need(args, 2, name).and_then(|_| strings::string_split(args)),
        "string_join" => need(args, 2, name).and_then(|_| strings::string_join(args)),
        "string_starts_with" => need(args, 2, name).and_then(|_| strings::string_starts_with(args)),
        "string_ends_with" => need(args, 2, name).and_then(|_| strings::string_ends_with(args)),
        "string_contains" => need(args, 2, name).and_then(|_| strings::string_contains(args)),
        "string_trim" => need(args, 1, name).and_then(|_| strings::string_trim(args)),
        "string_replace" => need(args, 3, name).and_then(|_| strings::string_replace(args)),

        // arrays
        "array_new" => arrays::array_new(args),
        "array_push" => need(args, 2, name).and_then(|_| arrays::array_push(args)),
        "array_get" => need(args, 2, name).and_then(|_| arrays::array_get(args)),
        "array_set" => need(args, 3, name).and_then(|_| arrays::array_set(args)),
        "array_length" => need(args, 1, name).and_then(|_| arrays::array_length(args)),
        "array_copy" => need(args, 1, name).and_then(|_| arrays::array_copy(args)),
        "array_sort" => need(args, 1, name).and_then(|_| arrays::array_sort(args)),
        "array_reverse" => need(args, 1, name).and_then(|_| arrays::array_reverse(args)),
        "array_contains" => need(args, 2, name).and_then(|_| arrays::array_contains(args)),
        "array_index_of" => need(args, 2, name).and_then(|_| arrays::array_index_of(args)),
        "array_pop" => need(args, 1, name).and_then(|_| arrays::array_pop(args)),
        "array_remove" => need(args, 2, name).and_then(|_| arrays::array_remove(args)),
        "array_slice" => need(args, 3, name).and_then(|_| arrays::array_slice(args)),
        "array_concat" => need(args, 2, name).and_then(|_| arrays::array_concat(args)),

        // maps
        "map_new" => maps::map_new(args),
        "map_set" => need(args, 3, name).and_then(|_| maps::map_set(args)),
        "map_get" => need(args, 2, name).and_then(|_| maps::map_get(args)),
        "map_has" => need(args, 2, name).and_then(|_| maps::map_has(args)),
        "map_delete" => need(args, 2, name).and_then(|_| maps::map_delete(args)),
        "map_keys" => need(args, 1, name).and_then(|_| maps::map_keys(args)),
        "map_copy" => need(args, 1, name).and_then(|_| maps::map_copy(args)),
        "map_entries" => need(args, 1, name).and_then(|_| maps::map_entries(args)),
        "map_length" => need(args, 1, name).and_then(|_| maps::map_length(args)),
        "map_values" => need(args, 1, name).and_then(|_| maps::map_values(args)),

        // files
        "file_read" => need(args, 1, name).and_then(|_| files::file_read(args)),
        "file_write" => need(args, 2, name).and_then(|_| files::file_write(args)),
        "file_append" => need(args, 2, name).and_then(|_| files::file_append(args)),
        "file_exists" => need(args, 1, name).and_then(|_| files::file_exists(args)),
        "file_size" => need(args, 1, name).and_then(|_| files::file_size(args)),
        "file_delete" => need(args, 1, name).and_then(|_| files::file_delete(args)),
        "dir_list" => need(args, 1, name).and_then(|_| files::dir_list(args)),
        "dir_create" => need(args, 1, name).and_then(|_| files::dir_create(args)),
        "dir_delete" => need(args, 1, name).and_then(|_| files::dir_delete(args)),

        // process/env
        "argv" => process_env::argv(args),
        "argv_count" => process_env::argv_count(args),
        "getenv" => need(args, 1, name).and_then(|_| process_env::getenv(args)),
        "exit" => need(args, 1, name).and_then(|_| process_env::exit(args)),

        // io
        "print" => need(args, 1, name).and_then(|_| io::print(args)),
        "println" => need(args, 1, name).and_then(|_| io::println(args)),
        "read_line" => io::read_line(args),
        "stdin_read_all" => io::stdin_read_all(args),

        // time
        "time_now" => time::time_now(args),
        "sleep" => need(args, 1, name).and_then(|_| time::sleep(args)),

        // processes & channels
        "process_spawn" => need(args, 1, name).and_then(|_| processes::process_spawn(args)),
        "process_write" => need(args, 2, name).and_then(|_| processes::process_write(args)),
        "process_read" => need(args, 1, name).and_then(|_| processes::process_read(args)),
        "process_wait" => need(args, 1, name).and_then(|_| processes::process_wait(args)),
        "process_kill" => need(args, 2, name).and_then(|_| processes::process_kill(args)),
        "process_exec" => need(args, 1, name).and_then(|_| processes::process_exec(args)),
        "channel_new" => processes::channel_new(args),
        "channel_send" => need(args, 2, name).and_then(|_| processes::channel_send(args)),
        "channel_recv" => need(args, 1, name).and_then(|_| processes::channel_recv(args)),

        // sockets
        "tcp_listen" => need(args, 1, name).and_then(|_| sockets::tcp_listen(args)),
        "tcp_accept" => need(args, 1, name).and_then(|_| sockets::tcp_accept(args)),
        "tcp_connect" => need(args, 2, name).and_then(|_| sockets::tcp_connect(args)),
        "tcp_tls_connect" => need(args, 2, name).and_then(|_| sockets::tcp_tls_connect(args)),
        "tcp_send" => need(args, 2, name).and_then(|_| sockets::tcp_send(args)),
        "tcp_receive" => need(args, 1, name).and_then(|_| sockets::tcp_receive(args)),
        "tcp_close" => need(args, 1, name).and_then(|_| sockets::tcp_close(args)),
        "socket_select" => need(args, 1, name).and_then(|_| sockets::socket_select(args)),

        // websocket
        "ws_accept" => need(args, 1, name).and_then(|_| websocket_builtins::ws_accept(args)),
        "ws_connect" => need(args, 3, name).and_then(|_| websocket_builtins::ws_connect(args)),
        "ws_send" => need(args, 2, name).and_then(|_| websocket_builtins::ws_send(args)),
        "ws_receive" => need(args, 1, name).and_then(|_| websocket_builtins::ws_receive(args)),
        "ws_close" => need(args, 1, name).and_then(|_| websocket_builtins::ws_close(args)),

        // json
        "json_new_object" => json_builtins::json_new_object(args),
        "json_new_array" => json_builtins::json_new_array(args),
        "json_parse" => need(args, 1, name).and_then(|_| json_builtins::json_parse(args)),
        "json_stringify" => need(args, 1, name).and_then(|_| json_builtins::json_stringify(args)),
        "json_get" => need(args, 2, name).and_then(|_| json_builtins::json_get(args)),
        "json_set" => need(args, 3, name).and_then(|_| json_builtins::json_set(args)),
        "json_has" => need(args, 2, name).and_then(|_| json_builtins::json_has(args)),
        "json_delete" => need(args, 2, name).and_then(|_| json_builtins::json_delete(args)),
        "json_push" => need(args, 2, name).and_then(|_| json_builtins::json_push(args)),
        "json_length" => need(args, 1, name).and_then(|_| json_builtins::json_length(args)),
        "json_type" => need(args, 1, name).and_then(|_| json_builtins::json_type(args)),

        // regex
        "regex_compile" => need(args, 1, name).and_then(|_| regex_builtins::regex_compile(args)),
        "regex_match" => need(args, 2, name).and_then(|_| regex_builtins::regex_match(args)),
        "regex_find" => need(args, 2, name).and_then(|_| regex_builtins::regex_find(args)),
        "regex_find_all" => need(args, 2, name).and_then(|_| regex_builtins::regex_find_all(args)),
        "regex_replace" => need(args, 3, name).and_then(|_| regex_builtins::regex_replace(args)),

        // reflection
        "type_of" => need(args, 1, name).and_then(|_| reflection::type_of(args)),
        "is_array" => need(args, 1, name).and_then(|_| reflection::is_array(args)),
        "is_object" => need(args, 1, name).and_then(|_| reflection::is_object(args)),

        _ => return None,
    };
    Some(result)
}
